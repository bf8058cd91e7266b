use std::fmt;

/// The kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Start-of-file sentinel, always the first token produced.
    Sof,
    /// End-of-file sentinel, always the last token produced.
    Eof,
    Bang,
    Dollar,
    Amp,
    LParen,
    RParen,
    Spread,
    Colon,
    Eq,
    At,
    LBracket,
    RBracket,
    LCurly,
    RCurly,
    Pipe,
    Name,
    Int,
    Float,
    String,
    BlockString,
}

impl TokenKind {
    /// Human-readable description used in `Expected X but found Y` messages.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            TokenKind::Sof => "<SOF>",
            TokenKind::Eof => "<EOF>",
            TokenKind::Bang => "\"!\"",
            TokenKind::Dollar => "\"$\"",
            TokenKind::Amp => "\"&\"",
            TokenKind::LParen => "\"(\"",
            TokenKind::RParen => "\")\"",
            TokenKind::Spread => "\"...\"",
            TokenKind::Colon => "\":\"",
            TokenKind::Eq => "\"=\"",
            TokenKind::At => "\"@\"",
            TokenKind::LBracket => "\"[\"",
            TokenKind::RBracket => "\"]\"",
            TokenKind::LCurly => "\"{\"",
            TokenKind::RCurly => "\"}\"",
            TokenKind::Pipe => "\"|\"",
            TokenKind::Name => "Name",
            TokenKind::Int => "Int",
            TokenKind::Float => "Float",
            TokenKind::String => "String",
            TokenKind::BlockString => "BlockString",
        }
    }
}

/// A single lexical token.
///
/// `start`/`end` are 0-indexed byte offsets into the source text.
/// Tokens are immutable: they are created once by the lexer and dropped once
/// the parser consumes them past its lookahead window. AST nodes keep only
/// offsets, never tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub(crate) kind: TokenKind,
    /// Raw source slice covered by the token (empty for SOF/EOF).
    pub(crate) data: &'a str,
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// Processed value for string tokens: escape sequences resolved, block
    /// strings dedented. `None` for every other kind.
    pub(crate) value: Option<String>,
}

impl<'a> Token<'a> {
    pub(crate) fn punctuator(kind: TokenKind, data: &'a str, start: usize) -> Self {
        Self {
            kind,
            data,
            start,
            end: start + data.len(),
            value: None,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Raw source text of the token.
    pub fn data(&self) -> &'a str {
        self.data
    }

    /// 0-indexed byte offset of the first character of the token.
    pub fn start(&self) -> usize {
        self.start
    }

    /// 0-indexed byte offset one past the last character of the token.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Processed string value, if this is a string token.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub(crate) fn describe(&self) -> String {
        match self.kind {
            TokenKind::Sof | TokenKind::Eof => self.kind.describe().to_owned(),
            TokenKind::Name | TokenKind::Int | TokenKind::Float => {
                format!("{} \"{}\"", self.kind.describe(), self.data)
            }
            _ => format!("\"{}\"", self.data),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Sof | TokenKind::Eof => f.write_str(self.kind.describe()),
            _ => f.write_str(self.data),
        }
    }
}
