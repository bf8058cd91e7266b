use crate::ast::{NamedType, ObjectTypeDefinition};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{directive, field, name};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#ObjectTypeDefinition
///
/// *ObjectTypeDefinition*:
///    Description? **type** Name ImplementsInterfaces? Directives? FieldsDefinition?
pub(crate) fn object_type_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Node<ObjectTypeDefinition>, SyntaxError> {
    p.expect_keyword("type")?;
    let name = name::name(p)?;
    let implements_interfaces = implements_interfaces(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let fields = if p.peek()? == TokenKind::LCurly {
        field::fields_definition(p)?
    } else {
        Vec::new()
    };
    Ok(p.node(
        ObjectTypeDefinition {
            description,
            name,
            implements_interfaces,
            directives,
            fields,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#ImplementsInterfaces
///
/// *ImplementsInterfaces*:
///    **implements** **&**? NamedType (**&** NamedType)\*
///
/// Under `allow_legacy_sdl_implements_interfaces`, bare whitespace-separated
/// names are also accepted: `implements A B`.
pub(crate) fn implements_interfaces(
    p: &mut Parser<'_>,
) -> Result<Vec<NamedType>, SyntaxError> {
    if !p.at_keyword("implements")? {
        return Ok(Vec::new());
    }
    p.advance()?;
    p.eat(TokenKind::Amp)?;
    let mut interfaces = vec![name::named_type(p)?];
    loop {
        if p.eat(TokenKind::Amp)? {
            interfaces.push(name::named_type(p)?);
        } else if p.opts.allow_legacy_sdl_implements_interfaces && p.peek()? == TokenKind::Name {
            interfaces.push(name::named_type(p)?);
        } else {
            break;
        }
    }
    Ok(interfaces)
}

#[cfg(test)]
mod test {
    use crate::ast::Definition;
    use crate::Parser;

    #[test]
    fn implements_interfaces_with_amp_separators() {
        let document = Parser::new("type Pet implements & Named & Animal { name: String }")
            .parse_document()
            .unwrap();
        let Definition::ObjectTypeDefinition(def) = &document.definitions[0] else {
            panic!("expected an object type")
        };
        assert_eq!(def.implements_interfaces, vec!["Named", "Animal"]);
    }

    #[test]
    fn legacy_implements_is_opt_in() {
        let source = "type Pet implements Named Animal { name: String }";
        // Without the legacy option, `Animal` reads as the start of
        // the next definition and fails.
        assert!(Parser::new(source).parse_document().is_err());
        let document = Parser::new(source)
            .allow_legacy_sdl_implements_interfaces(true)
            .parse_document()
            .unwrap();
        let Definition::ObjectTypeDefinition(def) = &document.definitions[0] else {
            panic!("expected an object type")
        };
        assert_eq!(def.implements_interfaces, vec!["Named", "Animal"]);
    }

    #[test]
    fn legacy_empty_fields_is_opt_in() {
        let source = "type Empty { }";
        assert!(Parser::new(source).parse_document().is_err());
        assert!(Parser::new(source)
            .allow_legacy_sdl_empty_fields(true)
            .parse_document()
            .is_ok());
    }
}
