mod cursor;
mod token;

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lexer::cursor::Cursor;
use crate::limit::LimitTracker;

pub use token::{Token, TokenKind};

/// Turns GraphQL source text into a stream of [`Token`]s.
///
/// The lexer is pull-based: each call to [`Iterator::next`] produces exactly
/// one token (or one error) and advances past it. The first token is always
/// the [`Sof`][TokenKind::Sof] sentinel and the last is
/// [`Eof`][TokenKind::Eof]; ignored source (whitespace, commas, comments, a
/// leading BOM) never produces tokens. The lexer never rewinds; lookahead is
/// the parser's concern.
///
/// ```rust
/// use gryphon_parser::Lexer;
///
/// let query = "{ animal ...snackSelection }";
/// let tokens = Lexer::new(query).lex().unwrap();
/// assert_eq!(tokens.len(), 7); // SOF { animal ... snackSelection } EOF
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    state: LexerState,
    limit: Option<LimitTracker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerState {
    Start,
    Active,
    Done,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            state: LexerState::Start,
            limit: None,
        }
    }

    /// Abort lexing with a [`LimitExceeded`][SyntaxErrorKind::LimitExceeded]
    /// error after producing `limit` tokens.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(LimitTracker::new(limit));
        self
    }

    /// Lex the full source text, consuming the lexer.
    ///
    /// Stops at the first lexical error.
    pub fn lex(self) -> Result<Vec<Token<'a>>, SyntaxError> {
        self.collect()
    }

    fn skip_ignored(&mut self) {
        loop {
            match self.cursor.first() {
                '\u{FEFF}' | '\t' | ' ' | ',' | '\n' | '\r' => {
                    self.cursor.bump();
                }
                '#' => {
                    self.cursor.bump();
                    while !self.cursor.is_eof() && !is_line_terminator(self.cursor.first()) {
                        self.cursor.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token<'a>, SyntaxError> {
        let start = self.cursor.offset();
        let first_char = self.cursor.first();

        match first_char {
            '"' => self.string_value(),
            '.' => self.spread_operator(),
            c if is_ident_start(c) => Ok(self.ident()),
            c if c.is_ascii_digit() || c == '-' => self.number(),
            '!' => Ok(self.punctuator(TokenKind::Bang)),
            '$' => Ok(self.punctuator(TokenKind::Dollar)),
            '&' => Ok(self.punctuator(TokenKind::Amp)),
            '(' => Ok(self.punctuator(TokenKind::LParen)),
            ')' => Ok(self.punctuator(TokenKind::RParen)),
            ':' => Ok(self.punctuator(TokenKind::Colon)),
            '=' => Ok(self.punctuator(TokenKind::Eq)),
            '@' => Ok(self.punctuator(TokenKind::At)),
            '[' => Ok(self.punctuator(TokenKind::LBracket)),
            ']' => Ok(self.punctuator(TokenKind::RBracket)),
            '{' => Ok(self.punctuator(TokenKind::LCurly)),
            '|' => Ok(self.punctuator(TokenKind::Pipe)),
            '}' => Ok(self.punctuator(TokenKind::RCurly)),
            c if c.is_control() => Err(SyntaxError::new(
                SyntaxErrorKind::InvalidCharacter,
                format!("Invalid character: {c:?}"),
                start,
            )),
            c => Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedCharacter,
                format!("Unexpected character: `{c}`"),
                start,
            )),
        }
    }

    fn punctuator(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.cursor.offset();
        self.cursor.bump();
        let end = self.cursor.offset();
        Token::punctuator(kind, self.cursor.slice(start, end), start)
    }

    fn spread_operator(&mut self) -> Result<Token<'a>, SyntaxError> {
        let start = self.cursor.offset();
        if self.cursor.rest().starts_with("...") {
            self.cursor.bump();
            self.cursor.bump();
            self.cursor.bump();
            Ok(Token::punctuator(
                TokenKind::Spread,
                self.cursor.slice(start, start + 3),
                start,
            ))
        } else {
            Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedCharacter,
                "Unexpected character: `.`, did you mean `...`?",
                start,
            ))
        }
    }

    fn ident(&mut self) -> Token<'a> {
        let start = self.cursor.offset();
        self.cursor.bump();
        while is_ident_char(self.cursor.first()) {
            self.cursor.bump();
        }
        let end = self.cursor.offset();
        Token {
            kind: TokenKind::Name,
            data: self.cursor.slice(start, end),
            start,
            end,
            value: None,
        }
    }

    fn number(&mut self) -> Result<Token<'a>, SyntaxError> {
        let start = self.cursor.offset();
        let mut is_float = false;

        self.cursor.eatc('-');
        if self.cursor.eatc('0') {
            if self.cursor.first().is_ascii_digit() {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnexpectedCharacter,
                    format!(
                        "Invalid number, unexpected digit after 0: `{}`",
                        self.cursor.first()
                    ),
                    self.cursor.offset(),
                ));
            }
        } else {
            self.expect_digits()?;
        }

        if self.cursor.eatc('.') {
            is_float = true;
            self.expect_digits()?;
        }
        if matches!(self.cursor.first(), 'e' | 'E') {
            is_float = true;
            self.cursor.bump();
            if matches!(self.cursor.first(), '+' | '-') {
                self.cursor.bump();
            }
            self.expect_digits()?;
        }

        // A number must not run directly into a name or another dot.
        let next = self.cursor.first();
        if next == '.' || is_ident_start(next) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedCharacter,
                format!("Invalid number, expected digit but got: `{next}`"),
                self.cursor.offset(),
            ));
        }

        let end = self.cursor.offset();
        Ok(Token {
            kind: if is_float {
                TokenKind::Float
            } else {
                TokenKind::Int
            },
            data: self.cursor.slice(start, end),
            start,
            end,
            value: None,
        })
    }

    /// Consume one or more ASCII digits.
    fn expect_digits(&mut self) -> Result<(), SyntaxError> {
        if self.cursor.is_eof() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedEof,
                "Unexpected end of input, expected digit",
                self.cursor.offset(),
            ));
        }
        if !self.cursor.first().is_ascii_digit() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedCharacter,
                format!("Invalid number, expected digit but got: `{}`", self.cursor.first()),
                self.cursor.offset(),
            ));
        }
        while self.cursor.first().is_ascii_digit() {
            self.cursor.bump();
        }
        Ok(())
    }

    fn string_value(&mut self) -> Result<Token<'a>, SyntaxError> {
        let start = self.cursor.offset();
        self.cursor.bump(); // opening quote

        if self.cursor.first() == '"' && self.cursor.second() == '"' {
            self.cursor.bump();
            self.cursor.bump();
            return self.block_string_value(start);
        }

        let mut value = String::new();
        loop {
            let char_offset = self.cursor.offset();
            match self.cursor.bump() {
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::NonTerminatedString,
                        "Unterminated string value",
                        char_offset,
                    ));
                }
                Some('"') => break,
                Some(c) if is_line_terminator(c) => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::NonTerminatedString,
                        "Unterminated string value: unexpected line terminator",
                        char_offset,
                    ));
                }
                Some('\\') => self.escaped_character(&mut value)?,
                Some(c) if c.is_control() && c != '\t' => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::InvalidCharacter,
                        format!("Invalid character within string: {c:?}"),
                        char_offset,
                    ));
                }
                Some(c) => value.push(c),
            }
        }

        let end = self.cursor.offset();
        Ok(Token {
            kind: TokenKind::String,
            data: self.cursor.slice(start, end),
            start,
            end,
            value: Some(value),
        })
    }

    fn escaped_character(&mut self, value: &mut String) -> Result<(), SyntaxError> {
        let char_offset = self.cursor.offset();
        match self.cursor.bump() {
            None => Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedEof,
                "Unexpected end of input in escape sequence",
                char_offset,
            )),
            Some('"') => {
                value.push('"');
                Ok(())
            }
            Some('\\') => {
                value.push('\\');
                Ok(())
            }
            Some('/') => {
                value.push('/');
                Ok(())
            }
            Some('b') => {
                value.push('\u{0008}');
                Ok(())
            }
            Some('f') => {
                value.push('\u{000C}');
                Ok(())
            }
            Some('n') => {
                value.push('\n');
                Ok(())
            }
            Some('r') => {
                value.push('\r');
                Ok(())
            }
            Some('t') => {
                value.push('\t');
                Ok(())
            }
            Some('u') => {
                let mut hex = String::with_capacity(4);
                let mut last_offset = char_offset;
                for _ in 0..4 {
                    last_offset = self.cursor.offset();
                    match self.cursor.bump() {
                        None => {
                            return Err(SyntaxError::new(
                                SyntaxErrorKind::UnexpectedEof,
                                "Unexpected end of input in escape sequence",
                                last_offset,
                            ));
                        }
                        Some(c) => hex.push(c),
                    }
                }
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(c) => {
                        value.push(c);
                        Ok(())
                    }
                    None => Err(SyntaxError::new(
                        SyntaxErrorKind::InvalidEscapeSequence,
                        format!("Invalid character escape sequence: `\\u{hex}`"),
                        last_offset,
                    )),
                }
            }
            Some(c) => Err(SyntaxError::new(
                SyntaxErrorKind::InvalidEscapeSequence,
                format!("Invalid character escape sequence: `\\{c}`"),
                char_offset,
            )),
        }
    }

    fn block_string_value(&mut self, start: usize) -> Result<Token<'a>, SyntaxError> {
        let mut raw = String::new();
        loop {
            if self.cursor.is_eof() {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::NonTerminatedString,
                    "Unterminated block string value",
                    self.cursor.offset(),
                ));
            }
            if self.cursor.rest().starts_with("\\\"\"\"") {
                raw.push_str("\"\"\"");
                for _ in 0..4 {
                    self.cursor.bump();
                }
            } else if self.cursor.rest().starts_with("\"\"\"") {
                self.cursor.bump();
                self.cursor.bump();
                self.cursor.bump();
                break;
            } else {
                // Unwrap can't fail: EOF was checked above.
                raw.push(self.cursor.bump().unwrap());
            }
        }
        let end = self.cursor.offset();
        Ok(Token {
            kind: TokenKind::BlockString,
            data: self.cursor.slice(start, end),
            start,
            end,
            value: Some(dedent_block_string(&raw)),
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            LexerState::Start => {
                self.state = LexerState::Active;
                Some(Ok(Token {
                    kind: TokenKind::Sof,
                    data: "",
                    start: 0,
                    end: 0,
                    value: None,
                }))
            }
            LexerState::Active => {
                self.skip_ignored();
                if let Some(limit) = &mut self.limit {
                    if limit.check_and_increment() {
                        self.state = LexerState::Done;
                        return Some(Err(SyntaxError::new(
                            SyntaxErrorKind::LimitExceeded,
                            "token limit reached, aborting lexing",
                            self.cursor.offset(),
                        )));
                    }
                }
                if self.cursor.is_eof() {
                    self.state = LexerState::Done;
                    let offset = self.cursor.offset();
                    return Some(Ok(Token {
                        kind: TokenKind::Eof,
                        data: "",
                        start: offset,
                        end: offset,
                        value: None,
                    }));
                }
                let result = self.next_token();
                if result.is_err() {
                    self.state = LexerState::Done;
                }
                Some(result)
            }
            LexerState::Done => None,
        }
    }
}

/// Strip uniform indentation and blank leading/trailing lines from a raw
/// block string, per the `BlockStringValue` algorithm in the GraphQL spec.
fn dedent_block_string(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut common_indent: Option<usize> = None;
    for line in lines.iter().skip(1) {
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        if indent < line.len() {
            common_indent = Some(match common_indent {
                Some(current) => current.min(indent),
                None => indent,
            });
        }
    }

    let mut result: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                *line
            } else {
                let indent = common_indent.unwrap_or(0).min(line.len());
                &line[indent..]
            }
        })
        .collect();

    while result
        .first()
        .is_some_and(|line| line.trim_matches([' ', '\t']).is_empty())
    {
        result.remove(0);
    }
    while result
        .last()
        .is_some_and(|line| line.trim_matches([' ', '\t']).is_empty())
    {
        result.pop();
    }

    result.join("\n")
}

fn is_ident_start(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
}

fn is_ident_char(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::SyntaxErrorKind;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .lex()
            .unwrap()
            .into_iter()
            .map(|token| token.kind())
            .collect()
    }

    fn lex_error(input: &str) -> SyntaxError {
        Lexer::new(input)
            .lex()
            .expect_err("expected a lexical error")
    }

    #[test]
    fn sof_and_eof_sentinels() {
        assert_eq!(kinds(""), vec![TokenKind::Sof, TokenKind::Eof]);
        assert_eq!(
            kinds("   # just a comment\n , \t"),
            vec![TokenKind::Sof, TokenKind::Eof]
        );
    }

    #[test]
    fn punctuators_and_spread() {
        assert_eq!(
            kinds("! $ ( ) ... : = @ [ ] { | } &"),
            vec![
                TokenKind::Sof,
                TokenKind::Bang,
                TokenKind::Dollar,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Spread,
                TokenKind::Colon,
                TokenKind::Eq,
                TokenKind::At,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LCurly,
                TokenKind::Pipe,
                TokenKind::RCurly,
                TokenKind::Amp,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn incomplete_spread_is_rejected() {
        let error = lex_error("..");
        assert_eq!(error.kind(), SyntaxErrorKind::UnexpectedCharacter);
        assert_eq!(error.position(), 0);
    }

    #[test]
    fn leading_zero_is_rejected() {
        let error = lex_error("00");
        assert_eq!(error.kind(), SyntaxErrorKind::UnexpectedCharacter);
        assert_eq!(error.position(), 1);
    }

    #[test]
    fn trailing_dot_is_unexpected_eof() {
        let error = lex_error("1.");
        assert_eq!(error.kind(), SyntaxErrorKind::UnexpectedEof);
        assert_eq!(error.position(), 2);
    }

    #[test]
    fn leading_dot_is_unexpected_character() {
        let error = lex_error(".123");
        assert_eq!(error.kind(), SyntaxErrorKind::UnexpectedCharacter);
        assert_eq!(error.position(), 0);
    }

    #[test]
    fn exponent_needs_digits() {
        let error = lex_error("1.0eA");
        assert_eq!(error.kind(), SyntaxErrorKind::UnexpectedCharacter);
        assert_eq!(error.position(), 4);
    }

    #[test]
    fn number_token_kinds() {
        let tokens = Lexer::new("4 -4 9.0 -9.2 7e3 1.2e-3 0").lex().unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Sof,
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Int,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[6].data(), "1.2e-3");
    }

    #[test]
    fn string_escapes_are_resolved() {
        let tokens = Lexer::new(r#""a\n\t\"\\Ab""#).lex().unwrap();
        assert_eq!(tokens[1].kind(), TokenKind::String);
        assert_eq!(tokens[1].value(), Some("a\n\t\"\\Ab"));
    }

    #[test]
    fn invalid_unicode_escape() {
        let error = lex_error(r#""\uXXXX""#);
        assert_eq!(error.kind(), SyntaxErrorKind::InvalidEscapeSequence);
        assert_eq!(error.position(), 6);
    }

    #[test]
    fn unknown_escape() {
        let error = lex_error(r#""\q""#);
        assert_eq!(error.kind(), SyntaxErrorKind::InvalidEscapeSequence);
        assert_eq!(error.position(), 2);
    }

    #[test]
    fn newline_in_string() {
        let error = lex_error("\"hello\nworld\"");
        assert_eq!(error.kind(), SyntaxErrorKind::NonTerminatedString);
        assert_eq!(error.position(), 6);
    }

    #[test]
    fn unterminated_string() {
        let error = lex_error("\"hello");
        assert_eq!(error.kind(), SyntaxErrorKind::NonTerminatedString);
    }

    #[test]
    fn block_string_dedent() {
        let input = "\"\"\"\n    Hello,\n      World!\n\n    Yours,\n      GraphQL.\n\"\"\"";
        let tokens = Lexer::new(input).lex().unwrap();
        assert_eq!(tokens[1].kind(), TokenKind::BlockString);
        assert_eq!(
            tokens[1].value(),
            Some("Hello,\n  World!\n\nYours,\n  GraphQL.")
        );
    }

    #[test]
    fn block_string_escaped_triple_quote() {
        let tokens = Lexer::new("\"\"\"esc \\\"\"\" done\"\"\"").lex().unwrap();
        assert_eq!(tokens[1].value(), Some("esc \"\"\" done"));
    }

    #[test]
    fn token_limit() {
        let result = Lexer::new("type Query { a a a a a a a a a }")
            .with_limit(5)
            .lex();
        let error = result.expect_err("limit should trip");
        assert_eq!(error.kind(), SyntaxErrorKind::LimitExceeded);
    }

    #[test]
    fn token_positions() {
        let tokens = Lexer::new("{ name }").lex().unwrap();
        let spans: Vec<_> = tokens.iter().map(|t| (t.start(), t.end())).collect();
        assert_eq!(spans, vec![(0, 0), (0, 1), (2, 6), (7, 8), (8, 8)]);
    }
}
