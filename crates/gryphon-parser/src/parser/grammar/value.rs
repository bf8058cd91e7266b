use crate::ast::{Name, Value};
use crate::lexer::TokenKind;
use crate::parser::grammar::name;
use crate::parser::Parser;
use crate::{Node, SyntaxError, SyntaxErrorKind};
use ordered_float::OrderedFloat;

/// Whether variables are allowed in the value being parsed.
///
/// Default values and type-system directive arguments require *Const* values;
/// a `$variable` there is a structural error, enforced here rather than by a
/// later check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constness {
    Const,
    NotConst,
}

/// See: https://spec.graphql.org/October2021/#Value
pub(crate) fn value(
    p: &mut Parser<'_>,
    constness: Constness,
) -> Result<Node<Value>, SyntaxError> {
    p.enter_recursion()?;
    let start = p.peek_token(0)?.start();
    let parsed = match p.peek()? {
        TokenKind::Dollar => {
            p.advance()?;
            let variable_name = name::name(p)?;
            if constness == Constness::Const {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnexpectedToken,
                    format!("Unexpected variable \"${variable_name}\" in a constant value"),
                    start,
                ));
            }
            Value::Variable(variable_name)
        }
        TokenKind::Int => {
            let token = p.advance()?;
            match token.data().parse::<i32>() {
                Ok(int) => Value::Int(int),
                // Digits only, too many of them for an i32.
                Err(_) => Value::BigInt(token.data().to_owned()),
            }
        }
        TokenKind::Float => {
            let token = p.advance()?;
            match token.data().parse::<f64>() {
                Ok(float) => Value::Float(OrderedFloat(float)),
                Err(_) => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnexpectedToken,
                        format!("Invalid float value \"{}\"", token.data()),
                        token.start(),
                    ));
                }
            }
        }
        TokenKind::String => {
            let token = p.advance()?;
            Value::String(token.value().unwrap_or_default().to_owned())
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
            Value::String(token.value().unwrap_or_default().to_owned())
        }
        TokenKind::Name => {
            let token = p.advance()?;
            match token.data() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                "null" => Value::Null,
                enum_value => Value::Enum(enum_value.to_owned()),
            }
        }
        TokenKind::LBracket => {
            p.advance()?;
            let mut items = Vec::new();
            while !p.eat(TokenKind::RBracket)? {
                items.push(value(p, constness)?);
            }
            Value::List(items)
        }
        TokenKind::LCurly => {
            p.advance()?;
            let mut fields: Vec<(Name, Node<Value>)> = Vec::new();
            while !p.eat(TokenKind::RCurly)? {
                let field_name = name::name(p)?;
                p.expect(TokenKind::Colon)?;
                fields.push((field_name, value(p, constness)?));
            }
            Value::Object(fields)
        }
        _ => return Err(p.unexpected("a value")),
    };
    p.exit_recursion();
    Ok(p.node(parsed, start))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Parser;

    fn parse(input: &str) -> Value {
        (*Parser::new(input).parse_value().unwrap()).clone()
    }

    #[test]
    fn scalar_literals() {
        assert_eq!(parse("4"), Value::Int(4));
        assert_eq!(parse("-4"), Value::Int(-4));
        assert_eq!(parse("4.2"), Value::Float(OrderedFloat(4.2)));
        assert_eq!(parse("true"), Value::Boolean(true));
        assert_eq!(parse("null"), Value::Null);
        assert_eq!(parse("RED"), Value::Enum("RED".into()));
        assert_eq!(parse(r#""hi""#), Value::String("hi".into()));
    }

    #[test]
    fn int_overflowing_i32_becomes_big_int() {
        assert_eq!(
            parse("10000000000"),
            Value::BigInt("10000000000".to_owned())
        );
    }

    #[test]
    fn nested_lists_and_objects() {
        let parsed = parse(r#"{a: [1, 2], b: {c: "d"}}"#);
        let Value::Object(fields) = parsed else {
            panic!("expected an object")
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "a");
        assert_eq!(
            *fields[0].1,
            Value::List(vec![Node::new(Value::Int(1)), Node::new(Value::Int(2))])
        );
    }

    #[test]
    fn variables_allowed_in_standalone_values() {
        assert_eq!(parse("$var"), Value::Variable("var".into()));
    }

    #[test]
    fn block_strings_can_be_disabled() {
        assert_eq!(
            parse(r#""""multi line""""#),
            Value::String("multi line".into())
        );
        let error = Parser::new(r#""""multi line""""#)
            .allow_block_strings(false)
            .parse_value()
            .expect_err("block strings disabled");
        assert_eq!(error.message(), "Block strings are not supported");
    }

    #[test]
    fn variables_rejected_in_const_values() {
        let error = Parser::new("query Q($a: Int = $b) { f }")
            .parse_document()
            .expect_err("default values are const");
        assert_eq!(error.kind(), SyntaxErrorKind::UnexpectedToken);
        assert_eq!(
            error.message(),
            "Unexpected variable \"$b\" in a constant value"
        );
    }
}
