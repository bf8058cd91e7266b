use crate::ast::Argument;
use crate::lexer::TokenKind;
use crate::parser::grammar::value::{self, Constness};
use crate::parser::grammar::name;
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#Arguments
///
/// *Arguments*: **(** Argument+ **)**
///
/// Returns an empty list when the next token is not `(`.
pub(crate) fn arguments(
    p: &mut Parser<'_>,
    constness: Constness,
) -> Result<Vec<Node<Argument>>, SyntaxError> {
    if p.peek()? != TokenKind::LParen {
        return Ok(Vec::new());
    }
    p.advance()?;
    let mut arguments = vec![argument(p, constness)?];
    while !p.eat(TokenKind::RParen)? {
        arguments.push(argument(p, constness)?);
    }
    Ok(arguments)
}

/// See: https://spec.graphql.org/October2021/#Argument
///
/// *Argument*: Name **:** Value
fn argument(p: &mut Parser<'_>, constness: Constness) -> Result<Node<Argument>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    let name = name::name(p)?;
    p.expect(TokenKind::Colon)?;
    let value = value::value(p, constness)?;
    Ok(p.node(Argument { name, value }, start))
}
