use crate::ast::{EnumTypeDefinition, EnumValueDefinition};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{description, directive, name};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#EnumTypeDefinition
///
/// *EnumTypeDefinition*:
///    Description? **enum** Name Directives? EnumValuesDefinition?
pub(crate) fn enum_type_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Node<EnumTypeDefinition>, SyntaxError> {
    p.expect_keyword("enum")?;
    let name = name::name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let values = if p.peek()? == TokenKind::LCurly {
        enum_values_definition(p)?
    } else {
        Vec::new()
    };
    Ok(p.node(
        EnumTypeDefinition {
            description,
            name,
            directives,
            values,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#EnumValuesDefinition
///
/// *EnumValuesDefinition*: **{** EnumValueDefinition+ **}**
pub(crate) fn enum_values_definition(
    p: &mut Parser<'_>,
) -> Result<Vec<Node<EnumValueDefinition>>, SyntaxError> {
    p.expect(TokenKind::LCurly)?;
    let mut values = vec![enum_value_definition(p)?];
    while !p.eat(TokenKind::RCurly)? {
        values.push(enum_value_definition(p)?);
    }
    Ok(values)
}

/// See: https://spec.graphql.org/October2021/#EnumValueDefinition
///
/// *EnumValueDefinition*: Description? EnumValue Directives?
fn enum_value_definition(p: &mut Parser<'_>) -> Result<Node<EnumValueDefinition>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    let description = description::description(p)?;
    let value = name::enum_value_name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    Ok(p.node(
        EnumValueDefinition {
            description,
            value,
            directives,
        },
        start,
    ))
}

#[cfg(test)]
mod test {
    use crate::ast::Definition;
    use crate::Parser;

    #[test]
    fn enum_values_cannot_be_reserved_words() {
        let error = Parser::new("enum Flag { true }").parse_document().unwrap_err();
        assert_eq!(
            error.message(),
            "Expected an enum value but found Name \"true\""
        );
    }

    #[test]
    fn parses_enum_with_descriptions() {
        let document = Parser::new(
            "enum Episode {\n  \"the first one\"\n  NEWHOPE\n  EMPIRE @deprecated\n}",
        )
        .parse_document()
        .unwrap();
        let Definition::EnumTypeDefinition(def) = &document.definitions[0] else {
            panic!("expected an enum type")
        };
        assert_eq!(def.values.len(), 2);
        assert_eq!(def.values[0].description.as_deref(), Some("the first one"));
        assert_eq!(def.values[1].directives.len(), 1);
    }
}
