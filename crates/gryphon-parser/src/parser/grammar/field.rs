use crate::ast::{Field, FieldDefinition};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{argument, description, directive, input, name, selection, ty};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#Field
///
/// *Field*: Alias? Name Arguments? Directives? SelectionSet?
pub(crate) fn field(p: &mut Parser<'_>) -> Result<Node<Field>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    let alias_or_name = name::name(p)?;
    let (alias, name) = if p.eat(TokenKind::Colon)? {
        (Some(alias_or_name), name::name(p)?)
    } else {
        (None, alias_or_name)
    };
    let arguments = argument::arguments(p, Constness::NotConst)?;
    let directives = directive::directives(p, Constness::NotConst)?;
    let selection_set = if p.peek()? == TokenKind::LCurly {
        selection::selection_set(p)?
    } else {
        Vec::new()
    };
    Ok(p.node(
        Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#FieldsDefinition
///
/// *FieldsDefinition*: **{** FieldDefinition+ **}**
///
/// Under `allow_legacy_sdl_empty_fields`, `{ }` is tolerated.
pub(crate) fn fields_definition(
    p: &mut Parser<'_>,
) -> Result<Vec<Node<FieldDefinition>>, SyntaxError> {
    p.expect(TokenKind::LCurly)?;
    if p.opts.allow_legacy_sdl_empty_fields && p.eat(TokenKind::RCurly)? {
        return Ok(Vec::new());
    }
    let mut fields = vec![field_definition(p)?];
    while !p.eat(TokenKind::RCurly)? {
        fields.push(field_definition(p)?);
    }
    Ok(fields)
}

/// See: https://spec.graphql.org/October2021/#FieldDefinition
///
/// *FieldDefinition*:
///    Description? Name ArgumentsDefinition? **:** Type Directives?
fn field_definition(p: &mut Parser<'_>) -> Result<Node<FieldDefinition>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    let description = description::description(p)?;
    let name = name::name(p)?;
    let arguments = input::arguments_definition(p)?;
    p.expect(TokenKind::Colon)?;
    let ty = ty::ty(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    Ok(p.node(
        FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
        },
        start,
    ))
}
