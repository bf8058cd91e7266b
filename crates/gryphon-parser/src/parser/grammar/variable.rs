use crate::ast::VariableDefinition;
use crate::lexer::TokenKind;
use crate::parser::grammar::value::{self, Constness};
use crate::parser::grammar::{directive, name, ty};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#VariableDefinitions
///
/// *VariableDefinitions*: **(** VariableDefinition+ **)**
pub(crate) fn variable_definitions(
    p: &mut Parser<'_>,
) -> Result<Vec<Node<VariableDefinition>>, SyntaxError> {
    p.expect(TokenKind::LParen)?;
    let mut variables = vec![variable_definition(p)?];
    while !p.eat(TokenKind::RParen)? {
        variables.push(variable_definition(p)?);
    }
    Ok(variables)
}

/// See: https://spec.graphql.org/October2021/#VariableDefinition
///
/// *VariableDefinition*: Variable **:** Type DefaultValue? Directives?
fn variable_definition(p: &mut Parser<'_>) -> Result<Node<VariableDefinition>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    p.expect(TokenKind::Dollar)?;
    let name = name::name(p)?;
    p.expect(TokenKind::Colon)?;
    let ty_start = p.peek_token(0)?.start();
    let ty = ty::ty(p)?;
    let ty = p.node(ty, ty_start);
    let default_value = if p.eat(TokenKind::Eq)? {
        Some(value::value(p, Constness::Const)?)
    } else {
        None
    };
    let directives = directive::directives(p, Constness::Const)?;
    Ok(p.node(
        VariableDefinition {
            name,
            ty,
            default_value,
            directives,
        },
        start,
    ))
}
