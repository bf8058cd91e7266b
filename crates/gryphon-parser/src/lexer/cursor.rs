use std::str::Chars;

/// Peekable iterator over a char sequence, tracking the absolute byte offset
/// of the next unconsumed character.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
}

pub(crate) const EOF_CHAR: char = '\0';

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            source: input,
            chars: input.chars(),
        }
    }

    /// Byte offset of the next unconsumed character.
    pub(crate) fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    /// Peek the next character without consuming it.
    pub(crate) fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    /// Peek the character after [`first`][Self::first].
    pub(crate) fn second(&self) -> char {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    /// Consume and return the next character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Consume the next character if it equals `c`.
    pub(crate) fn eatc(&mut self, c: char) -> bool {
        if self.first() == c {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Remaining unconsumed input.
    pub(crate) fn rest(&self) -> &'a str {
        self.chars.as_str()
    }

    /// Source slice between two byte offsets.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }
}
