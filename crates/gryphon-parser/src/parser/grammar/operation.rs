use crate::ast::{OperationDefinition, OperationType};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{directive, name, selection, variable};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#OperationDefinition
///
/// *OperationDefinition*:
///    OperationType Name? VariableDefinitions? Directives? SelectionSet
///    SelectionSet
pub(crate) fn operation_definition(
    p: &mut Parser<'_>,
) -> Result<Node<OperationDefinition>, SyntaxError> {
    let start = p.peek_token(0)?.start();
    if p.peek()? == TokenKind::LCurly {
        // A bare `{` is always an anonymous query.
        let selection_set = selection::selection_set(p)?;
        return Ok(p.node(
            OperationDefinition {
                operation_type: OperationType::Query,
                name: None,
                variables: Vec::new(),
                directives: Vec::new(),
                selection_set,
            },
            start,
        ));
    }
    let operation_type = operation_type(p)?;
    let name = if p.peek()? == TokenKind::Name {
        Some(name::name(p)?)
    } else {
        None
    };
    let variables = if p.peek()? == TokenKind::LParen {
        variable::variable_definitions(p)?
    } else {
        Vec::new()
    };
    let directives = directive::directives(p, Constness::NotConst)?;
    let selection_set = selection::selection_set(p)?;
    Ok(p.node(
        OperationDefinition {
            operation_type,
            name,
            variables,
            directives,
            selection_set,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#OperationType
///
/// *OperationType*: one of
///    **query**    **mutation**    **subscription**
fn operation_type(p: &mut Parser<'_>) -> Result<OperationType, SyntaxError> {
    if p.peek()? == TokenKind::Name {
        if let Some(operation_type) = OperationType::from_name(p.peek_data()?) {
            p.advance()?;
            return Ok(operation_type);
        }
    }
    Err(p.unexpected("\"query\", \"mutation\" or \"subscription\""))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::Definition;
    use crate::Parser;

    #[test]
    fn named_operation_with_variables() {
        let document = Parser::new("mutation MakeIt($id: ID!) @auth { makeIt(id: $id) }")
            .parse_document()
            .unwrap();
        let Definition::OperationDefinition(operation) = &document.definitions[0] else {
            panic!("expected an operation")
        };
        assert_eq!(operation.operation_type, OperationType::Mutation);
        assert_eq!(operation.name.as_deref(), Some("MakeIt"));
        assert_eq!(operation.variables.len(), 1);
        assert_eq!(operation.directives.len(), 1);
    }

    #[test]
    fn unterminated_selection_set() {
        let error = Parser::new("{").parse_document().unwrap_err();
        assert_eq!(error.message(), "Expected Name but found <EOF>");
        assert_eq!(error.position(), 1);
    }

    #[test]
    fn empty_selection_set_is_rejected() {
        let error = Parser::new("{}").parse_document().unwrap_err();
        assert_eq!(error.message(), "Expected Name but found \"}\"");
    }
}
