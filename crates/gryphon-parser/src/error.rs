use std::fmt;

/// The category of a lexical or syntactic failure.
///
/// Lexical kinds are produced by the [`Lexer`][crate::Lexer]; the parser only
/// ever adds [`UnexpectedToken`][SyntaxErrorKind::UnexpectedToken] (and
/// re-surfaces lexer errors unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// A control character appeared where source content was expected.
    InvalidCharacter,
    /// A character does not start any valid token, or a numeric grammar rule
    /// was violated (leading zero, missing digit after `.` or an exponent).
    UnexpectedCharacter,
    /// End of input was reached while a multi-character token was incomplete.
    UnexpectedEof,
    /// A single-line string ran into a line terminator or end of input.
    NonTerminatedString,
    /// An unknown `\x` escape or a malformed `\uXXXX` sequence.
    InvalidEscapeSequence,
    /// The parser found a well-formed token it cannot accept here.
    UnexpectedToken,
    /// A configured token or recursion limit was exceeded.
    LimitExceeded,
}

/// An error produced by the lexer or the parser.
///
/// Carries the failure [`kind`][Self::kind], a human-readable message and the
/// 0-indexed character offset into the source text at which the failure was
/// detected. [`line_column`][Self::line_column] converts the offset into the
/// 1-indexed line/column pair used in serialized GraphQL error locations.
#[derive(Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub(crate) kind: SyntaxErrorKind,
    pub(crate) message: String,
    pub(crate) position: usize,
}

impl SyntaxError {
    pub(crate) fn new(
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        position: usize,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
        }
    }

    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 0-indexed character offset at which the error was detected.
    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-indexed `(line, column)` of [`position`][Self::position] within
    /// `source`, counting characters the way [`str::chars`] does.
    ///
    /// `source` must be the text the error was produced from.
    pub fn line_column(&self, source: &str) -> (usize, usize) {
        line_column(source, self.position)
    }
}

impl fmt::Debug for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ERROR@{} {:?} {:?}",
            self.position, self.kind, self.message
        )
    }
}

/// Scan `source` to convert a 0-indexed byte offset into 1-indexed line and
/// column numbers, counting columns in characters like [`str::chars`].
/// Offsets past the end of input map to one past the last character, so
/// errors at EOF point just after the final token.
pub fn line_column(source: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (index, c) in source.char_indices() {
        if index >= position {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn line_column_is_one_indexed() {
        assert_eq!(line_column("{ a }", 0), (1, 1));
        assert_eq!(line_column("{ a }", 2), (1, 3));
        assert_eq!(line_column("{\n  a\n}", 4), (2, 3));
        // Offset at EOF points one past the last character.
        assert_eq!(line_column("{", 1), (1, 2));
    }
}
