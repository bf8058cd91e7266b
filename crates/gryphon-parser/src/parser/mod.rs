mod grammar;

use crate::ast;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::limit::LimitTracker;
use crate::node::{Node, NodeLocation};
use std::collections::VecDeque;

/// Parse text into an abstract syntax tree.
///
/// Consumes the [`Lexer`]'s token stream through a small lookahead window:
/// GraphQL needs at most two tokens of lookahead (detecting `on` after `...`,
/// or a description string before a type-system keyword). Parsing stops at
/// the first error.
///
/// ```rust
/// use gryphon_parser::Parser;
///
/// let query = "
/// query GetSnacks {
///   snacks {
///     name
///   }
/// }
/// ";
/// let document = Parser::new(query).parse_document().unwrap();
/// assert_eq!(document.definitions.len(), 1);
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Tokens pulled from the lexer but not yet consumed.
    window: VecDeque<Token<'a>>,
    /// End offset of the most recently consumed token, for node spans.
    prev_end: usize,
    recursion: LimitTracker,
    pub(crate) opts: ParserOptions,
}

#[derive(Debug, Clone)]
pub(crate) struct ParserOptions {
    pub(crate) no_location: bool,
    pub(crate) allow_type_system: bool,
    pub(crate) allow_block_strings: bool,
    pub(crate) allow_legacy_sdl_empty_fields: bool,
    pub(crate) allow_legacy_sdl_implements_interfaces: bool,
    pub(crate) experimental_fragment_variables: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            no_location: false,
            allow_type_system: true,
            allow_block_strings: true,
            allow_legacy_sdl_empty_fields: false,
            allow_legacy_sdl_implements_interfaces: false,
            experimental_fragment_variables: false,
        }
    }
}

impl<'a> Parser<'a> {
    /// Default recursion limit for nested selection sets, list/object values
    /// and list types.
    const DEFAULT_RECURSION_LIMIT: usize = 4_096;

    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            window: VecDeque::new(),
            prev_end: 0,
            recursion: LimitTracker::new(Self::DEFAULT_RECURSION_LIMIT),
            opts: ParserOptions::default(),
        }
    }

    /// Configure the recursion limit for nested productions.
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion = LimitTracker::new(limit);
        self
    }

    /// Configure the limit on the number of tokens to parse. If an input
    /// document is too big, parsing aborts with a
    /// [`LimitExceeded`][SyntaxErrorKind::LimitExceeded] error.
    pub fn token_limit(mut self, limit: usize) -> Self {
        self.lexer = self.lexer.clone().with_limit(limit);
        self
    }

    /// Do not record source spans on AST nodes.
    pub fn no_location(mut self) -> Self {
        self.opts.no_location = true;
        self
    }

    /// Accept type-system (SDL) definitions. Enabled by default; when
    /// disabled, only operations and fragments are legal definitions.
    pub fn allow_type_system(mut self, allow: bool) -> Self {
        self.opts.allow_type_system = allow;
        self
    }

    /// Accept `"""` block strings. Enabled by default.
    pub fn allow_block_strings(mut self, allow: bool) -> Self {
        self.opts.allow_block_strings = allow;
        self
    }

    /// Accept SDL object and interface types with an empty `{}` fields block,
    /// a historical leniency.
    pub fn allow_legacy_sdl_empty_fields(mut self, allow: bool) -> Self {
        self.opts.allow_legacy_sdl_empty_fields = allow;
        self
    }

    /// Accept `implements A B` with no `&` separators, a historical leniency.
    pub fn allow_legacy_sdl_implements_interfaces(mut self, allow: bool) -> Self {
        self.opts.allow_legacy_sdl_implements_interfaces = allow;
        self
    }

    /// Parse variable definitions on fragment definitions, a non-standard
    /// extension.
    pub fn experimental_fragment_variables(mut self, allow: bool) -> Self {
        self.opts.experimental_fragment_variables = allow;
        self
    }

    /// Parse a full document: `SOF Definition* EOF`.
    pub fn parse_document(mut self) -> Result<ast::Document, SyntaxError> {
        self.expect(TokenKind::Sof)?;
        let mut definitions = Vec::new();
        while self.peek()? != TokenKind::Eof {
            definitions.push(grammar::document::definition(&mut self)?);
        }
        self.expect(TokenKind::Eof)?;
        Ok(ast::Document { definitions })
    }

    /// Parse a standalone value: `SOF Value EOF`. Variables are allowed.
    pub fn parse_value(mut self) -> Result<Node<ast::Value>, SyntaxError> {
        self.expect(TokenKind::Sof)?;
        let value = grammar::value::value(&mut self, grammar::value::Constness::NotConst)?;
        self.expect(TokenKind::Eof)?;
        Ok(value)
    }

    /// Parse a standalone type reference: `SOF Type EOF`.
    pub fn parse_type(mut self) -> Result<Node<ast::Type>, SyntaxError> {
        self.expect(TokenKind::Sof)?;
        let start = self.peek_token(0)?.start();
        let ty = grammar::ty::ty(&mut self)?;
        self.expect(TokenKind::Eof)?;
        Ok(self.node(ty, start))
    }

    // Token plumbing

    fn pull(&mut self) -> Result<Token<'a>, SyntaxError> {
        match self.lexer.next() {
            Some(result) => result,
            // Unreachable as long as nothing is consumed past EOF.
            None => Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedEof,
                "token stream exhausted",
                self.prev_end,
            )),
        }
    }

    /// Ensure the lookahead window holds at least `n + 1` tokens and return
    /// the `n`-th (0-indexed) without consuming it.
    pub(crate) fn peek_token(&mut self, n: usize) -> Result<&Token<'a>, SyntaxError> {
        while self.window.len() <= n {
            let token = self.pull()?;
            self.window.push_back(token);
        }
        Ok(&self.window[n])
    }

    /// Kind of the next unconsumed token.
    pub(crate) fn peek(&mut self) -> Result<TokenKind, SyntaxError> {
        Ok(self.peek_token(0)?.kind())
    }

    /// Raw text of the next unconsumed token.
    pub(crate) fn peek_data(&mut self) -> Result<&'a str, SyntaxError> {
        Ok(self.peek_token(0)?.data())
    }

    /// Consume and return the next token.
    pub(crate) fn advance(&mut self) -> Result<Token<'a>, SyntaxError> {
        let token = match self.window.pop_front() {
            Some(token) => token,
            None => self.pull()?,
        };
        self.prev_end = token.end();
        Ok(token)
    }

    /// Consume the next token, which must be of the given kind.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, SyntaxError> {
        if self.peek()? == kind {
            self.advance()
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    /// Consume the next token if it is of the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Result<bool, SyntaxError> {
        if self.peek()? == kind {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Whether the next token is the given keyword (a `Name` with exactly
    /// that text).
    pub(crate) fn at_keyword(&mut self, keyword: &str) -> Result<bool, SyntaxError> {
        let token = self.peek_token(0)?;
        Ok(token.kind() == TokenKind::Name && token.data() == keyword)
    }

    /// Consume the next token, which must be the given keyword.
    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> Result<(), SyntaxError> {
        if self.at_keyword(keyword)? {
            self.advance()?;
            Ok(())
        } else {
            Err(self.unexpected(&format!("\"{keyword}\"")))
        }
    }

    /// An `UnexpectedToken` error at the next token:
    /// `Expected {expected} but found {actual}`.
    pub(crate) fn unexpected(&mut self, expected: &str) -> SyntaxError {
        match self.peek_token(0) {
            Ok(token) => SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken,
                format!("Expected {expected} but found {}", token.describe()),
                token.start(),
            ),
            Err(error) => error,
        }
    }

    // Recursive productions call this on entry and `exit_recursion` on exit.
    pub(crate) fn enter_recursion(&mut self) -> Result<(), SyntaxError> {
        if self.recursion.check_and_increment() {
            Err(SyntaxError::new(
                SyntaxErrorKind::LimitExceeded,
                "parser recursion limit reached",
                self.prev_end,
            ))
        } else {
            Ok(())
        }
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion.decrement();
    }

    /// Wrap a parsed value in a [`Node`] spanning from `start` to the end of
    /// the most recently consumed token.
    pub(crate) fn node<T>(&self, node: T, start: usize) -> Node<T> {
        if self.opts.no_location {
            Node::new(node)
        } else {
            Node::new_parsed(node, NodeLocation::new(start, self.prev_end))
        }
    }
}
