use crate::ast::Type;
use crate::lexer::TokenKind;
use crate::parser::grammar::name;
use crate::parser::Parser;
use crate::SyntaxError;

/// See: https://spec.graphql.org/October2021/#Type
///
/// *Type*:
///    NamedType
///    ListType
///    NonNullType
pub(crate) fn ty(p: &mut Parser<'_>) -> Result<Type, SyntaxError> {
    p.enter_recursion()?;
    let parsed = match p.peek()? {
        TokenKind::LBracket => {
            p.advance()?;
            let item = ty(p)?;
            p.expect(TokenKind::RBracket)?;
            Type::List(Box::new(item))
        }
        TokenKind::Name => Type::Named(name::named_type(p)?),
        _ => return Err(p.unexpected("a type")),
    };
    p.exit_recursion();
    if p.eat(TokenKind::Bang)? {
        Ok(parsed.non_null())
    } else {
        Ok(parsed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Parser;

    fn parse(input: &str) -> Type {
        (*Parser::new(input).parse_type().unwrap()).clone()
    }

    #[test]
    fn named_and_wrapped_types() {
        assert_eq!(parse("String"), Type::new_named("String"));
        assert_eq!(parse("String!"), Type::new_named("String").non_null());
        assert_eq!(parse("[String]"), Type::new_named("String").list());
        assert_eq!(
            parse("[String!]!"),
            Type::new_named("String").non_null().list().non_null()
        );
    }

    #[test]
    fn unclosed_list_type() {
        let error = Parser::new("[String").parse_type().unwrap_err();
        assert_eq!(error.message(), "Expected \"]\" but found <EOF>");
    }
}
