use crate::ast::Selection;
use crate::lexer::TokenKind;
use crate::parser::grammar::{field, fragment};
use crate::parser::Parser;
use crate::SyntaxError;

/// See: https://spec.graphql.org/October2021/#SelectionSet
///
/// *SelectionSet*: **{** Selection+ **}**
pub(crate) fn selection_set(p: &mut Parser<'_>) -> Result<Vec<Selection>, SyntaxError> {
    p.enter_recursion()?;
    p.expect(TokenKind::LCurly)?;
    let mut selections = vec![selection(p)?];
    while !p.eat(TokenKind::RCurly)? {
        selections.push(selection(p)?);
    }
    p.exit_recursion();
    Ok(selections)
}

/// See: https://spec.graphql.org/October2021/#Selection
///
/// *Selection*:
///    Field
///    FragmentSpread
///    InlineFragment
fn selection(p: &mut Parser<'_>) -> Result<Selection, SyntaxError> {
    if p.peek()? == TokenKind::Spread {
        fragment::fragment_selection(p)
    } else {
        Ok(Selection::Field(field::field(p)?))
    }
}
