use crate::ast::InterfaceTypeDefinition;
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{directive, field, name, object};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#InterfaceTypeDefinition
///
/// *InterfaceTypeDefinition*:
///    Description? **interface** Name ImplementsInterfaces? Directives? FieldsDefinition?
pub(crate) fn interface_type_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Node<InterfaceTypeDefinition>, SyntaxError> {
    p.expect_keyword("interface")?;
    let name = name::name(p)?;
    let implements_interfaces = object::implements_interfaces(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let fields = if p.peek()? == TokenKind::LCurly {
        field::fields_definition(p)?
    } else {
        Vec::new()
    };
    Ok(p.node(
        InterfaceTypeDefinition {
            description,
            name,
            implements_interfaces,
            directives,
            fields,
        },
        start,
    ))
}
