use crate::ast::Definition;
use crate::lexer::TokenKind;
use crate::parser::grammar::{
    description, directive, enum_, extensions, fragment, input, interface, object, operation,
    scalar, schema, union_,
};
use crate::parser::Parser;
use crate::SyntaxError;

/// See: https://spec.graphql.org/October2021/#Definition
///
/// *Definition*:
///    ExecutableDefinition
///    TypeSystemDefinition
///    TypeSystemExtension
///
/// When the parser is configured without type-system support, only
/// executable definitions are legal and everything else is an
/// `UnexpectedToken` error.
pub(crate) fn definition(p: &mut Parser<'_>) -> Result<Definition, SyntaxError> {
    let start = p.peek_token(0)?.start();
    match p.peek()? {
        TokenKind::LCurly => Ok(Definition::OperationDefinition(
            operation::operation_definition(p)?,
        )),
        TokenKind::String | TokenKind::BlockString => {
            if !p.opts.allow_type_system {
                return Err(p.unexpected("an executable definition"));
            }
            let description = description::description(p)?;
            type_system_definition(p, description, start)
        }
        TokenKind::Name => match p.peek_data()? {
            "query" | "mutation" | "subscription" => Ok(Definition::OperationDefinition(
                operation::operation_definition(p)?,
            )),
            "fragment" => Ok(Definition::FragmentDefinition(
                fragment::fragment_definition(p)?,
            )),
            "schema" | "scalar" | "type" | "interface" | "union" | "enum" | "input"
            | "directive" => {
                if !p.opts.allow_type_system {
                    return Err(p.unexpected("an executable definition"));
                }
                type_system_definition(p, None, start)
            }
            "extend" => {
                if !p.opts.allow_type_system {
                    return Err(p.unexpected("an executable definition"));
                }
                extensions::type_system_extension(p, start)
            }
            _ => Err(p.unexpected("a definition")),
        },
        _ => Err(p.unexpected("a definition")),
    }
}

/// See: https://spec.graphql.org/October2021/#TypeSystemDefinition
fn type_system_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Definition, SyntaxError> {
    if p.peek()? != TokenKind::Name {
        return Err(p.unexpected("a type system definition"));
    }
    match p.peek_data()? {
        "schema" => Ok(Definition::SchemaDefinition(schema::schema_definition(
            p,
            description,
            start,
        )?)),
        "scalar" => Ok(Definition::ScalarTypeDefinition(
            scalar::scalar_type_definition(p, description, start)?,
        )),
        "type" => Ok(Definition::ObjectTypeDefinition(
            object::object_type_definition(p, description, start)?,
        )),
        "interface" => Ok(Definition::InterfaceTypeDefinition(
            interface::interface_type_definition(p, description, start)?,
        )),
        "union" => Ok(Definition::UnionTypeDefinition(
            union_::union_type_definition(p, description, start)?,
        )),
        "enum" => Ok(Definition::EnumTypeDefinition(
            enum_::enum_type_definition(p, description, start)?,
        )),
        "input" => Ok(Definition::InputObjectTypeDefinition(
            input::input_object_type_definition(p, description, start)?,
        )),
        "directive" => Ok(Definition::DirectiveDefinition(
            directive::directive_definition(p, description, start)?,
        )),
        _ => Err(p.unexpected("a type system definition")),
    }
}

#[cfg(test)]
mod test {
    use crate::Parser;

    #[test]
    fn sdl_is_rejected_without_type_system_support() {
        let source = "type Query { hello: String }";
        assert!(Parser::new(source).parse_document().is_ok());
        let error = Parser::new(source)
            .allow_type_system(false)
            .parse_document()
            .unwrap_err();
        assert_eq!(
            error.message(),
            "Expected an executable definition but found Name \"type\""
        );
    }

    #[test]
    fn descriptions_are_rejected_without_type_system_support() {
        let error = Parser::new("\"a scalar\" scalar Odd")
            .allow_type_system(false)
            .parse_document()
            .unwrap_err();
        assert_eq!(
            error.message(),
            "Expected an executable definition but found \"\"a scalar\"\""
        );
    }
}
