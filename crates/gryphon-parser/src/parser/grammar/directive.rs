use crate::ast::{Directive, DirectiveDefinition, DirectiveLocation};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{argument, input, name};
use crate::parser::Parser;
use crate::{Node, SyntaxError, SyntaxErrorKind};

/// See: https://spec.graphql.org/October2021/#Directives
///
/// *Directives*: Directive+
///
/// Returns an empty list when the next token is not `@`.
pub(crate) fn directives(
    p: &mut Parser<'_>,
    constness: Constness,
) -> Result<Vec<Node<Directive>>, SyntaxError> {
    let mut directives = Vec::new();
    while p.peek()? == TokenKind::At {
        directives.push(directive(p, constness)?);
    }
    Ok(directives)
}

/// See: https://spec.graphql.org/October2021/#Directive
///
/// *Directive*: **@** Name Arguments?
fn directive(p: &mut Parser<'_>, constness: Constness) -> Result<Node<Directive>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    p.expect(TokenKind::At)?;
    let name = name::name(p)?;
    let arguments = argument::arguments(p, constness)?;
    Ok(p.node(Directive { name, arguments }, start))
}

/// See: https://spec.graphql.org/October2021/#DirectiveDefinition
///
/// *DirectiveDefinition*:
///    Description? **directive @** Name ArgumentsDefinition? **repeatable**? **on** DirectiveLocations
pub(crate) fn directive_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Node<DirectiveDefinition>, SyntaxError> {
    p.expect_keyword("directive")?;
    p.expect(TokenKind::At)?;
    let name = name::name(p)?;
    let arguments = input::arguments_definition(p)?;
    let repeatable = if p.at_keyword("repeatable")? {
        p.advance()?;
        true
    } else {
        false
    };
    p.expect_keyword("on")?;
    let locations = directive_locations(p)?;
    Ok(p.node(
        DirectiveDefinition {
            description,
            name,
            arguments,
            repeatable,
            locations,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#DirectiveLocations
///
/// *DirectiveLocations*:
///    **|**? DirectiveLocation (**|** DirectiveLocation)\*
fn directive_locations(p: &mut Parser<'_>) -> Result<Vec<DirectiveLocation>, SyntaxError> {
    p.eat(TokenKind::Pipe)?;
    let mut locations = vec![directive_location(p)?];
    while p.eat(TokenKind::Pipe)? {
        locations.push(directive_location(p)?);
    }
    Ok(locations)
}

fn directive_location(p: &mut Parser<'_>) -> Result<DirectiveLocation, SyntaxError> {
    let (kind, data, start) = {
        let token = p.peek_token(0)?;
        (token.kind(), token.data(), token.start())
    };
    if kind != TokenKind::Name {
        return Err(p.unexpected("a directive location"));
    }
    match DirectiveLocation::from_name(data) {
        Some(location) => {
            p.advance()?;
            Ok(location)
        }
        None => Err(SyntaxError::new(
            SyntaxErrorKind::UnexpectedToken,
            format!("Unexpected Name \"{data}\"; expected a directive location"),
            start,
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::Definition;
    use crate::Parser;

    #[test]
    fn parses_directive_definition() {
        let document = Parser::new(
            "directive @example(reason: String = \"unspecified\") repeatable on FIELD | FRAGMENT_SPREAD",
        )
        .parse_document()
        .unwrap();
        let Definition::DirectiveDefinition(def) = &document.definitions[0] else {
            panic!("expected a directive definition")
        };
        assert_eq!(def.name, "example");
        assert!(def.repeatable);
        assert_eq!(
            def.locations,
            vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread
            ]
        );
    }

    #[test]
    fn rejects_unknown_directive_location() {
        let error = Parser::new("directive @bad on EVERYWHERE")
            .parse_document()
            .unwrap_err();
        assert_eq!(
            error.message(),
            "Unexpected Name \"EVERYWHERE\"; expected a directive location"
        );
    }
}
