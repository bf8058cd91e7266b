use crate::ast::{NamedType, OperationType, SchemaDefinition};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{directive, name};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#SchemaDefinition
///
/// *SchemaDefinition*:
///    Description? **schema** Directives? **{** RootOperationTypeDefinition+ **}**
pub(crate) fn schema_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Node<SchemaDefinition>, SyntaxError> {
    p.expect_keyword("schema")?;
    let directives = directive::directives(p, Constness::Const)?;
    let root_operations = root_operation_types(p)?;
    Ok(p.node(
        SchemaDefinition {
            description,
            directives,
            root_operations,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#RootOperationTypeDefinition
///
/// *RootOperationTypeDefinition*: OperationType **:** NamedType
pub(crate) fn root_operation_types(
    p: &mut Parser<'_>,
) -> Result<Vec<(OperationType, NamedType)>, SyntaxError> {
    p.expect(TokenKind::LCurly)?;
    let mut root_operations = vec![root_operation_type(p)?];
    while !p.eat(TokenKind::RCurly)? {
        root_operations.push(root_operation_type(p)?);
    }
    Ok(root_operations)
}

fn root_operation_type(
    p: &mut Parser<'_>,
) -> Result<(OperationType, NamedType), SyntaxError> {
    let operation_type = if p.peek()? == TokenKind::Name {
        OperationType::from_name(p.peek_data()?)
    } else {
        None
    };
    let Some(operation_type) = operation_type else {
        return Err(p.unexpected("\"query\", \"mutation\" or \"subscription\""));
    };
    p.advance()?;
    p.expect(TokenKind::Colon)?;
    let named_type = name::named_type(p)?;
    Ok((operation_type, named_type))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::Definition;
    use crate::Parser;

    #[test]
    fn parses_schema_definition() {
        let document = Parser::new("schema { query: MyQuery mutation: MyMutation }")
            .parse_document()
            .unwrap();
        let Definition::SchemaDefinition(def) = &document.definitions[0] else {
            panic!("expected a schema definition")
        };
        assert_eq!(
            def.root_operations,
            vec![
                (OperationType::Query, "MyQuery".to_owned()),
                (OperationType::Mutation, "MyMutation".to_owned()),
            ]
        );
    }
}
