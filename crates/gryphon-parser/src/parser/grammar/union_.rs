use crate::ast::{NamedType, UnionTypeDefinition};
use crate::lexer::TokenKind;
use crate::parser::grammar::value::Constness;
use crate::parser::grammar::{directive, name};
use crate::parser::Parser;
use crate::{Node, SyntaxError};

/// See: https://spec.graphql.org/October2021/#UnionTypeDefinition
///
/// *UnionTypeDefinition*:
///    Description? **union** Name Directives? UnionMemberTypes?
pub(crate) fn union_type_definition(
    p: &mut Parser<'_>,
    description: Option<String>,
    start: usize,
) -> Result<Node<UnionTypeDefinition>, SyntaxError> {
    p.expect_keyword("union")?;
    let name = name::name(p)?;
    let directives = directive::directives(p, Constness::Const)?;
    let members = if p.peek()? == TokenKind::Eq {
        union_member_types(p)?
    } else {
        Vec::new()
    };
    Ok(p.node(
        UnionTypeDefinition {
            description,
            name,
            directives,
            members,
        },
        start,
    ))
}

/// See: https://spec.graphql.org/October2021/#UnionMemberTypes
///
/// *UnionMemberTypes*:
///    **=** **|**? NamedType (**|** NamedType)\*
pub(crate) fn union_member_types(p: &mut Parser<'_>) -> Result<Vec<NamedType>, SyntaxError> {
    p.expect(TokenKind::Eq)?;
    p.eat(TokenKind::Pipe)?;
    let mut members = vec![name::named_type(p)?];
    while p.eat(TokenKind::Pipe)? {
        members.push(name::named_type(p)?);
    }
    Ok(members)
}

#[cfg(test)]
mod test {
    use crate::ast::Definition;
    use crate::Parser;

    #[test]
    fn union_members_with_optional_leading_pipe() {
        let document = Parser::new("union SearchResult = | Human | Droid")
            .parse_document()
            .unwrap();
        let Definition::UnionTypeDefinition(def) = &document.definitions[0] else {
            panic!("expected a union type")
        };
        assert_eq!(def.members, vec!["Human", "Droid"]);
    }
}
