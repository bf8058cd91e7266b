use crate::ast::Name;
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::SyntaxError;

/// See: https://spec.graphql.org/October2021/#Name
pub(crate) fn name(p: &mut Parser<'_>) -> Result<Name, SyntaxError> {
    Ok(p.expect(TokenKind::Name)?.data().to_owned())
}

/// A name used as a type reference.
///
/// See: https://spec.graphql.org/October2021/#NamedType
pub(crate) fn named_type(p: &mut Parser<'_>) -> Result<Name, SyntaxError> {
    name(p)
}

/// See: https://spec.graphql.org/October2021/#EnumValue
///
/// A Name, but not **true**, **false** or **null**.
pub(crate) fn enum_value_name(p: &mut Parser<'_>) -> Result<Name, SyntaxError> {
    if p.peek()? == TokenKind::Name && matches!(p.peek_data()?, "true" | "false" | "null") {
        return Err(p.unexpected("an enum value"));
    }
    name(p)
}
