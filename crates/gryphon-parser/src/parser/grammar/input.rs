use crate::ast::{InputObjectTypeDefinition, InputValueDefinition};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::{self, Constness};
use crate::parser::grammar::{description, directive, name, ty};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#InputObjectTypeDefinition
///
/// *InputObjectTypeDefinition*:
///    Description? **input** Name Directives? InputFieldsDefinition?
pub(crate) fn input_object_type_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Node<InputObjectTypeDefinition>, SyntaxError> {
    p.expect_keyword("input")?;
    let name = name::name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let fields = if p.peek()? == TokenKind::LCurly {
        input_fields_definition(p)?
    } else {
        Vec::new()
    };
    Ok(p.node(
        InputObjectTypeDefinition {
            description,
            name,
            directives,
            fields,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#InputFieldsDefinition
///
/// *InputFieldsDefinition*: **{** InputValueDefinition+ **}**
pub(crate) fn input_fields_definition(
    p: &mut Parser<'_>,
) -> Result<Vec<Node<InputValueDefinition>>, SyntaxError> {
    p.expect(TokenKind::LCurly)?;
    let mut fields = vec![input_value_definition(p)?];
    while !p.eat(TokenKind::RCurly)? {
        fields.push(input_value_definition(p)?);
    }
    Ok(fields)
}

/// See: https://spec.graphql.org/October2021/#ArgumentsDefinition
///
/// *ArgumentsDefinition*: **(** InputValueDefinition+ **)**
///
/// Returns an empty list when the next token is not `(`.
pub(crate) fn arguments_definition(
    p: &mut Parser<'_>,
) -> Result<Vec<Node<InputValueDefinition>>, SyntaxError> {
    if p.peek()? != TokenKind::LParen {
        return Ok(Vec::new());
    }
    p.advance()?;
    let mut arguments = vec![input_value_definition(p)?];
    while !p.eat(TokenKind::RParen)? {
        arguments.push(input_value_definition(p)?);
    }
    Ok(arguments)
}

/// See: https://spec.graphql.org/October2021/#InputValueDefinition
///
/// *InputValueDefinition*:
///    Description? Name **:** Type DefaultValue? Directives?
fn input_value_definition(p: &mut Parser<'_>) -> Result<Node<InputValueDefinition>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    let description = description::description(p)?;
    let name = name::name(p)?;
    p.expect(TokenKind::Colon)?;
    let ty_start = p.peek_token(0)?.start();
    let parsed_ty = ty::ty(p)?;
    let parsed_ty = p.node(parsed_ty, ty_start);
    let default_value = if p.eat(TokenKind::Eq)? {
        Some(value::value(p, Constness::Const)?)
    } else {
        None
    };
    let directives = directive::directives(p, Constness::Const)?;
    Ok(p.node(
        InputValueDefinition {
            description,
            name,
            ty: parsed_ty,
            default_value,
            directives,
        },
        start,
    ))
}
