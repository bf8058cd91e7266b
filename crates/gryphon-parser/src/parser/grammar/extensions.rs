use crate::ast::{
    Definition, EnumTypeExtension, InputObjectTypeExtension, InterfaceTypeExtension,
    ObjectTypeExtension, ScalarTypeExtension, SchemaExtension, UnionTypeExtension,
};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{directive, enum_, field, input, name, object, schema, union_};
use crate::parser::Parser;
use crate::SyntaxError;

/// See: https://spec.graphql.org/October2021/#TypeSystemExtension
///
/// Every extension must add something: an extension consisting of only
/// `extend <keyword> Name` is an `UnexpectedToken` error.
pub(crate) fn type_system_extension(
    p: &mut Parser<'_>,
    start: usize,
) -> Result<Definition, SyntaxError> {
    p.expect_keyword("extend")?;
    if p.peek()? != TokenKind::Name {
        return Err(p.unexpected("a type system extension"));
    }
    match p.peek_data()? {
        "schema" => schema_extension(p, start),
        "scalar" => scalar_type_extension(p, start),
        "type" => object_type_extension(p, start),
        "interface" => interface_type_extension(p, start),
        "union" => union_type_extension(p, start),
        "enum" => enum_type_extension(p, start),
        "input" => input_object_type_extension(p, start),
        _ => Err(p.unexpected("a type system extension")),
    }
}

/// See: https://spec.graphql.org/October2021/#SchemaExtension
fn schema_extension(p: &mut Parser<'_>, start: usize) -> Result<Definition, SyntaxError> {
    p.expect_keyword("schema")?;
    let directives = directive::directives(p, Constness::Const)?;
    let root_operations = if p.peek()? == TokenKind::LCurly {
        schema::root_operation_types(p)?
    } else {
        Vec::new()
    };
    if directives.is_empty() && root_operations.is_empty() {
        return Err(p.unexpected("directives or root operation types"));
    }
    Ok(Definition::SchemaExtension(p.node(
        SchemaExtension {
            directives,
            root_operations,
        },
        start,
    )))
}

/// See: https://spec.graphql.org/October2021/#ScalarTypeExtension
fn scalar_type_extension(p: &mut Parser<'_>, start: usize) -> Result<Definition, SyntaxError> {
    p.expect_keyword("scalar")?;
    let name = name::name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    if directives.is_empty() {
        return Err(p.unexpected("directives"));
    }
    Ok(Definition::ScalarTypeExtension(p.node(
        ScalarTypeExtension { name, directives },
        start,
    )))
}

/// See: https://spec.graphql.org/October2021/#ObjectTypeExtension
fn object_type_extension(p: &mut Parser<'_>, start: usize) -> Result<Definition, SyntaxError> {
    p.expect_keyword("type")?;
    let name = name::name(p)?;
    let implements_interfaces = object::implements_interfaces(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let fields = if p.peek()? == TokenKind::LCurly {
        field::fields_definition(p)?
    } else {
        Vec::new()
    };
    if implements_interfaces.is_empty() && directives.is_empty() && fields.is_empty() {
        return Err(p.unexpected("interfaces, directives or a fields definition"));
    }
    Ok(Definition::ObjectTypeExtension(p.node(
        ObjectTypeExtension {
            name,
            implements_interfaces,
            directives,
            fields,
        },
        start,
    )))
}

/// See: https://spec.graphql.org/October2021/#InterfaceTypeExtension
fn interface_type_extension(p: &mut Parser<'_>, start: usize) -> Result<Definition, SyntaxError> {
    p.expect_keyword("interface")?;
    let name = name::name(p)?;
    let implements_interfaces = object::implements_interfaces(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let fields = if p.peek()? == TokenKind::LCurly {
        field::fields_definition(p)?
    } else {
        Vec::new()
    };
    if implements_interfaces.is_empty() && directives.is_empty() && fields.is_empty() {
        return Err(p.unexpected("interfaces, directives or a fields definition"));
    }
    Ok(Definition::InterfaceTypeExtension(p.node(
        InterfaceTypeExtension {
            name,
            implements_interfaces,
            directives,
            fields,
        },
        start,
    )))
}

/// See: https://spec.graphql.org/October2021/#UnionTypeExtension
fn union_type_extension(p: &mut Parser<'_>, start: usize) -> Result<Definition, SyntaxError> {
    p.expect_keyword("union")?;
    let name = name::name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let members = if p.peek()? == TokenKind::Eq {
        union_::union_member_types(p)?
    } else {
        Vec::new()
    };
    if directives.is_empty() && members.is_empty() {
        return Err(p.unexpected("directives or union member types"));
    }
    Ok(Definition::UnionTypeExtension(p.node(
        UnionTypeExtension {
            name,
            directives,
            members,
        },
        start,
    )))
}

/// See: https://spec.graphql.org/October2021/#EnumTypeExtension
fn enum_type_extension(p: &mut Parser<'_>, start: usize) -> Result<Definition, SyntaxError> {
    p.expect_keyword("enum")?;
    let name = name::name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let values = if p.peek()? == TokenKind::LCurly {
        enum_::enum_values_definition(p)?
    } else {
        Vec::new()
    };
    if directives.is_empty() && values.is_empty() {
        return Err(p.unexpected("directives or enum values"));
    }
    Ok(Definition::EnumTypeExtension(p.node(
        EnumTypeExtension {
            name,
            directives,
            values,
        },
        start,
    )))
}

/// See: https://spec.graphql.org/October2021/#InputObjectTypeExtension
fn input_object_type_extension(
    p: &mut Parser<'_>,
    start: usize,
) -> Result<Definition, SyntaxError> {
    p.expect_keyword("input")?;
    let name = name::name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let fields = if p.peek()? == TokenKind::LCurly {
        input::input_fields_definition(p)?
    } else {
        Vec::new()
    };
    if directives.is_empty() && fields.is_empty() {
        return Err(p.unexpected("directives or input fields"));
    }
    Ok(Definition::InputObjectTypeExtension(p.node(
        InputObjectTypeExtension {
            name,
            directives,
            fields,
        },
        start,
    )))
}

#[cfg(test)]
mod test {
    use crate::Parser;

    #[test]
    fn extensions_must_add_something() {
        let error = Parser::new("extend type Pony").parse_document().unwrap_err();
        assert_eq!(
            error.message(),
            "Expected interfaces, directives or a fields definition but found <EOF>"
        );
        let error = Parser::new("extend scalar Date").parse_document().unwrap_err();
        assert_eq!(error.message(), "Expected directives but found <EOF>");
    }

    #[test]
    fn parses_extensions() {
        let document = Parser::new(
            "extend type Query { tail: String }\n\
             extend union Search = Tag\n\
             extend schema @dir",
        )
        .parse_document()
        .unwrap();
        assert_eq!(document.definitions.len(), 3);
        assert!(document.definitions.iter().all(|def| def.is_extension()));
    }
}
