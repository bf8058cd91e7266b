use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::{SyntaxError, SyntaxErrorKind};

/// See: https://spec.graphql.org/October2021/#Description
///
/// *Description*: StringValue
pub(crate) fn description(p: &mut Parser<'_>) -> Result<Option<String>, SyntaxError> {
    match p.peek()? {
        TokenKind::String => {
            let token = p.advance()?;
            Ok(Some(token.value().unwrap_or_default().to_owned()))
        }
        TokenKind::BlockString => {
            if !p.opts.allow_block_strings {
                let token = p.peek_token(0)?;
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnexpectedToken,
                    "Block strings are not supported",
                    token.start(),
                ));
            }
            let token = p.advance()?;
            Ok(Some(token.value().unwrap_or_default().to_owned()))
        }
        _ => Ok(None),
    }
}
