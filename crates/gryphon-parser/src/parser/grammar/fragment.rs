use crate::ast::{FragmentDefinition, FragmentSpread, InlineFragment, Selection};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{directive, name, selection, variable};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// A selection starting with `...`: a fragment spread or an inline fragment.
///
/// The tie-break is the name following the spread: a name that is not
/// literally `on` means a spread, anything else (including no name at all)
/// means an inline fragment. Fragments can therefore never be named `on`.
///
/// See: https://spec.graphql.org/October2021/#FragmentSpread
/// See: https://spec.graphql.org/October2021/#InlineFragment
pub(crate) fn fragment_selection(p: &mut Parser<'_>) -> Result<Selection, SyntaxError> {
    let start = p.peek_token(0)?.start();
    p.expect(TokenKind::Spread)?;
    if p.peek()? == TokenKind::Name && !p.at_keyword("on")? {
        let fragment_name = name::name(p)?;
        let directives = directive::directives(p, Constness::NotConst)?;
        Ok(Selection::FragmentSpread(p.node(
            FragmentSpread {
                fragment_name,
                directives,
            },
            start,
        )))
    } else {
        let type_condition = if p.at_keyword("on")? {
            p.advance()?;
            Some(name::named_type(p)?)
        } else {
            None
        };
        let directives = directive::directives(p, Constness::NotConst)?;
        let selection_set = selection::selection_set(p)?;
        Ok(Selection::InlineFragment(p.node(
            InlineFragment {
                type_condition,
                directives,
                selection_set,
            },
            start,
        )))
    }
}

/// See: https://spec.graphql.org/October2021/#FragmentDefinition
///
/// *FragmentDefinition*:
///    **fragment** FragmentName TypeCondition Directives? SelectionSet
pub(crate) fn fragment_definition(
    p: &mut Parser<'_>,
) -> Result<Node<FragmentDefinition>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    p.expect_keyword("fragment")?;
    let name = fragment_name(p)?;
    let variables = if p.opts.experimental_fragment_variables && p.peek()? == TokenKind::LParen {
        variable::variable_definitions(p)?
    } else {
        Vec::new()
    };
    p.expect_keyword("on")?;
    let type_condition = name::named_type(p)?;
    let directives = directive::directives(p, Constness::NotConst)?;
    let selection_set = selection::selection_set(p)?;
    Ok(p.node(
        FragmentDefinition {
            name,
            type_condition,
            variables,
            directives,
            selection_set,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#FragmentName
///
/// A Name, but not **on**.
fn fragment_name(p: &mut Parser<'_>) -> Result<String, SyntaxError> {
    if p.at_keyword("on")? {
        return Err(p.unexpected("a fragment name"));
    }
    name::name(p)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::Definition;
    use crate::Parser;

    #[test]
    fn spread_versus_inline_fragment() {
        let document = Parser::new("{ ...pony ... on Droid { name } ... { id } }")
            .parse_document()
            .unwrap();
        let Definition::OperationDefinition(operation) = &document.definitions[0] else {
            panic!("expected an operation")
        };
        assert!(matches!(
            &operation.selection_set[0],
            Selection::FragmentSpread(spread) if spread.fragment_name == "pony"
        ));
        assert!(matches!(
            &operation.selection_set[1],
            Selection::InlineFragment(inline)
                if inline.type_condition.as_deref() == Some("Droid")
        ));
        assert!(matches!(
            &operation.selection_set[2],
            Selection::InlineFragment(inline) if inline.type_condition.is_none()
        ));
    }

    #[test]
    fn fragments_cannot_be_named_on() {
        let error = Parser::new("fragment on on Droid { name }")
            .parse_document()
            .unwrap_err();
        assert_eq!(
            error.message(),
            "Expected a fragment name but found Name \"on\""
        );
    }

    #[test]
    fn fragment_variables_are_opt_in() {
        let source = "fragment withVars($first: Int = 10) on Query { items }";
        assert!(Parser::new(source).parse_document().is_err());
        let document = Parser::new(source)
            .experimental_fragment_variables(true)
            .parse_document()
            .unwrap();
        let Definition::FragmentDefinition(fragment) = &document.definitions[0] else {
            panic!("expected a fragment definition")
        };
        assert_eq!(fragment.variables.len(), 1);
    }
}
