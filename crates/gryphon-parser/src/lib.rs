#![doc = include_str!("../README.md")]

mod lexer;

pub mod ast;
mod error;
mod limit;
mod node;
mod parser;

pub use crate::error::line_column;
pub use crate::error::SyntaxError;
pub use crate::error::SyntaxErrorKind;
pub use crate::lexer::Lexer;
pub use crate::lexer::{Token, TokenKind};
pub use crate::limit::LimitTracker;
pub use crate::node::{Node, NodeLocation};
pub use crate::parser::Parser;
