use crate::ast::ScalarTypeDefinition;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{directive, name};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#ScalarTypeDefinition
///
/// *ScalarTypeDefinition*:
///    Description? **scalar** Name Directives?
pub(crate) fn scalar_type_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Node<ScalarTypeDefinition>, SyntaxError> {
    p.expect_keyword("scalar")?;
    let name = name::name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    Ok(p.node(
        ScalarTypeDefinition {
            description,
            name,
            directives,
        },
        start,
    ))
}
