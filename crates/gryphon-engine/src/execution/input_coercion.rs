//! Coercion of variable and argument values against the types the schema
//! declares for them.
//!
//! Variable coercion failures are request errors (the whole execution is
//! aborted); argument coercion failures are field errors (the field is
//! nulled and its siblings continue).

use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::schema::ExtendedType;
use crate::schema::Schema;
use gryphon_parser::ast;
use gryphon_parser::Node;
use gryphon_parser::NodeLocation;

/// A value did not coerce to the type expected of it.
#[derive(Debug, Clone)]
pub struct InputCoercionError {
    pub(crate) message: String,
    pub(crate) location: Option<NodeLocation>,
}

impl InputCoercionError {
    fn new(message: impl Into<String>, location: Option<NodeLocation>) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

macro_rules! coercion_error {
    ($location: expr, $($arg: tt)+) => {
        return Err(InputCoercionError::new(format!($($arg)+), $location))
    };
}

/// Coerce the values of variables from a request to the types declared by
/// the operation.
///
/// This is [CoerceVariableValues()](https://spec.graphql.org/October2021/#CoerceVariableValues())
/// in the GraphQL specification.
pub(crate) fn coerce_variable_values(
    schema: &Schema,
    operation: &ast::OperationDefinition,
    values: &JsonMap,
) -> Result<JsonMap, InputCoercionError> {
    let mut coerced_values = JsonMap::new();
    for variable_def in &operation.variables {
        let name = variable_def.name.as_str();
        let location = variable_def.location();
        if let Some(value) = values.get(name) {
            let value = coerce_json_value(
                schema,
                "variable",
                "",
                "",
                name,
                &variable_def.ty,
                value,
                location,
            )?;
            coerced_values.insert(name.to_owned(), value);
        } else if let Some(default) = &variable_def.default_value {
            let value = graphql_value_to_json("variable", "", "", name, default, None)?;
            coerced_values.insert(name.to_owned(), value);
        } else if variable_def.ty.is_non_null() {
            coercion_error!(location, r#"Missing value for non-null variable "{name}""#)
        } else {
            // Nullable variable with neither a provided value nor a default:
            // left absent, which is distinct from an explicit null.
        }
    }
    Ok(coerced_values)
}

/// Coerce the argument values of one field selection against the argument
/// definitions of its field definition.
///
/// This is [CoerceArgumentValues()](https://spec.graphql.org/October2021/#CoerceArgumentValues())
/// in the GraphQL specification.
pub(crate) fn coerce_argument_values(
    schema: &Schema,
    field_definition: &ast::FieldDefinition,
    field: &Node<ast::Field>,
    variables: &JsonMap,
) -> Result<JsonMap, InputCoercionError> {
    let mut coerced = JsonMap::new();
    for argument_def in &field_definition.arguments {
        let name = argument_def.name.as_str();
        let ty = &argument_def.ty;
        let mut location = field.location();
        let mut provided = None;
        if let Some(value) = field.argument_by_name(name) {
            location = value.location().or(location);
            if let ast::Value::Variable(variable) = value.as_ref() {
                // An unset variable behaves as if the argument was omitted.
                provided = variables.get(variable.as_str()).cloned();
            } else {
                provided = Some(graphql_value_to_json(
                    "argument",
                    "",
                    "",
                    name,
                    value,
                    Some(variables),
                )?);
            }
        }
        let Some(value) = provided else {
            if let Some(default) = &argument_def.default_value {
                let value = graphql_value_to_json("argument", "", "", name, default, None)?;
                coerced.insert(name.to_owned(), value);
            } else if ty.is_non_null() {
                coercion_error!(
                    location,
                    r#"Argument "{name}" of required type "{ty}" was not provided"#
                )
            }
            continue;
        };
        if value.is_null() && ty.is_non_null() {
            coercion_error!(
                location,
                r#"Argument "{name}" of non-null type "{ty}" must not be null"#
            )
        }
        let value = coerce_json_value(schema, "argument", "", "", name, ty, &value, location)?;
        coerced.insert(name.to_owned(), value);
    }
    Ok(coerced)
}

/// Coerce one JSON value against a declared type.
#[allow(clippy::too_many_arguments)] // not a nice signature but it is internal
fn coerce_json_value(
    schema: &Schema,
    kind: &str,
    parent: &str,
    sep: &str,
    name: &str,
    ty: &ast::Type,
    value: &JsonValue,
    location: Option<NodeLocation>,
) -> Result<JsonValue, InputCoercionError> {
    if value.is_null() {
        if ty.is_non_null() {
            coercion_error!(location, "null value for non-null {kind} {parent}{sep}{name}")
        } else {
            return Ok(JsonValue::Null);
        }
    }
    let ty_name = match ty {
        ast::Type::List(inner) | ast::Type::NonNullList(inner) => {
            // https://spec.graphql.org/October2021/#sec-List.Input-Coercion
            return value
                .as_array()
                .map(Vec::as_slice)
                // If not an array, treat the value as an array of size one:
                .unwrap_or(std::slice::from_ref(value))
                .iter()
                .map(|item| {
                    coerce_json_value(schema, kind, parent, sep, name, inner, item, location)
                })
                .collect();
        }
        ast::Type::Named(ty_name) | ast::Type::NonNullNamed(ty_name) => ty_name,
    };
    let Some(ty_def) = schema.types.get(ty_name) else {
        coercion_error!(location, "Undefined type {ty_name} for {kind} {parent}{sep}{name}")
    };
    match ty_def {
        ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_) => {
            coercion_error!(location, "Non-input type {ty_name} for {kind} {parent}{sep}{name}")
        }
        ExtendedType::Scalar(_) => match ty_name.as_str() {
            "Int" => {
                // https://spec.graphql.org/October2021/#sec-Int.Input-Coercion
                if value
                    .as_i64()
                    .is_some_and(|value| i32::try_from(value).is_ok())
                {
                    return Ok(value.clone());
                }
            }
            "Float" => {
                // https://spec.graphql.org/October2021/#sec-Float.Input-Coercion
                if value.is_f64() || value.is_i64() {
                    return Ok(value.clone());
                }
            }
            "String" => {
                // https://spec.graphql.org/October2021/#sec-String.Input-Coercion
                if value.is_string() {
                    return Ok(value.clone());
                }
            }
            "Boolean" => {
                // https://spec.graphql.org/October2021/#sec-Boolean.Input-Coercion
                if value.is_boolean() {
                    return Ok(value.clone());
                }
            }
            "ID" => {
                // https://spec.graphql.org/October2021/#sec-ID.Input-Coercion
                if value.is_string() || value.is_i64() {
                    return Ok(value.clone());
                }
            }
            _ => {
                // Custom scalar: accept the value as provided.
                return Ok(value.clone());
            }
        },
        ExtendedType::Enum(ty_def) => {
            // https://spec.graphql.org/October2021/#sec-Enums.Input-Coercion
            if let Some(str) = value.as_str() {
                if ty_def.values.contains_key(str) {
                    return Ok(value.clone());
                }
            }
        }
        ExtendedType::InputObject(ty_def) => {
            // https://spec.graphql.org/October2021/#sec-Input-Objects.Input-Coercion
            if let Some(object) = value.as_object() {
                if let Some(key) = object
                    .keys()
                    .find(|key| !ty_def.fields.contains_key(key.as_str()))
                {
                    coercion_error!(location, "Input object has key {key} not in type {ty_name}")
                }
                let mut coerced = JsonMap::new();
                for (field_name, field_def) in &ty_def.fields {
                    if let Some(field_value) = object.get(field_name.as_str()) {
                        let field_value = coerce_json_value(
                            schema,
                            "input field",
                            ty_name,
                            ".",
                            field_name,
                            &field_def.ty,
                            field_value,
                            location,
                        )?;
                        coerced.insert(field_name.clone(), field_value);
                    } else if let Some(default) = &field_def.default_value {
                        let default = graphql_value_to_json(
                            "input field",
                            ty_name,
                            ".",
                            field_name,
                            default,
                            None,
                        )?;
                        coerced.insert(field_name.clone(), default);
                    } else if field_def.ty.is_non_null() {
                        coercion_error!(
                            location,
                            "Missing value for non-null input object field {ty_name}.{field_name}"
                        )
                    } else {
                        // Field not required
                    }
                }
                return Ok(coerced.into());
            }
        }
    }
    coercion_error!(
        location,
        "Could not coerce {kind} {parent}{sep}{name}: {value} to type {ty_name}"
    )
}

/// Convert a GraphQL value literal to JSON. When `variables` is given,
/// variable references are substituted; in constant contexts (default
/// values) a variable reference is an error.
fn graphql_value_to_json(
    kind: &str,
    parent: &str,
    sep: &str,
    name: &str,
    value: &Node<ast::Value>,
    variables: Option<&JsonMap>,
) -> Result<JsonValue, InputCoercionError> {
    let location = value.location();
    match value.as_ref() {
        ast::Value::Null => Ok(JsonValue::Null),
        ast::Value::Variable(variable) => match variables {
            Some(variables) => Ok(variables
                .get(variable.as_str())
                .cloned()
                .unwrap_or(JsonValue::Null)),
            None => coercion_error!(
                location,
                "Variable in default value of {kind} {parent}{sep}{name}"
            ),
        },
        ast::Value::Enum(value) => Ok(value.as_str().into()),
        ast::Value::String(value) => Ok(value.as_str().into()),
        ast::Value::Boolean(value) => Ok((*value).into()),
        ast::Value::Int(value) => Ok((*value).into()),
        // Rely on `serde_json::Number`'s own parser to use whatever
        // precision it supports.
        ast::Value::BigInt(value) => Ok(JsonValue::Number(value.parse().map_err(|_| {
            InputCoercionError::new(
                format!("Int value overflow in {kind} {parent}{sep}{name}"),
                location,
            )
        })?)),
        ast::Value::Float(value) => Ok(JsonValue::Number(
            serde_json::Number::from_f64(value.into_inner()).ok_or_else(|| {
                InputCoercionError::new(
                    format!("Float value overflow in {kind} {parent}{sep}{name}"),
                    location,
                )
            })?,
        )),
        ast::Value::List(values) => values
            .iter()
            .map(|value| graphql_value_to_json(kind, parent, sep, name, value, variables))
            .collect(),
        ast::Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| {
                Ok((
                    key.clone(),
                    graphql_value_to_json(kind, parent, sep, name, value, variables)?,
                ))
            })
            .collect(),
    }
}

#[cfg(test)]
mod test {
    use super::coerce_argument_values;
    use super::coerce_variable_values;
    use crate::response::JsonMap;
    use crate::schema::Schema;
    use gryphon_parser::ast;
    use serde_json::json;

    fn test_schema() -> Schema {
        Schema::parse(
            "type Query { human(id: String!, limit: Int = 10): String }\n\
             input Point { x: Int!, y: Int! }",
        )
        .unwrap()
    }

    fn operation(source: &str) -> gryphon_parser::Node<ast::OperationDefinition> {
        let document = gryphon_parser::Parser::new(source).parse_document().unwrap();
        let operation = document.operations().next().unwrap().clone();
        operation
    }

    fn first_field(
        operation: &ast::OperationDefinition,
    ) -> gryphon_parser::Node<ast::Field> {
        operation.selection_set[0].as_field().unwrap().clone()
    }

    #[test]
    fn missing_required_argument() {
        let schema = test_schema();
        let operation = operation("{ human }");
        let field = first_field(&operation);
        let field_def = schema.type_field("Query", "human").unwrap();
        let error =
            coerce_argument_values(&schema, field_def, &field, &JsonMap::new()).unwrap_err();
        assert_eq!(
            error.message,
            r#"Argument "id" of required type "String!" was not provided"#
        );
    }

    #[test]
    fn argument_defaults_apply() {
        let schema = test_schema();
        let operation = operation(r#"{ human(id: "1000") }"#);
        let field = first_field(&operation);
        let field_def = schema.type_field("Query", "human").unwrap();
        let coerced =
            coerce_argument_values(&schema, field_def, &field, &JsonMap::new()).unwrap();
        assert_eq!(coerced.get("id"), Some(&json!("1000")));
        assert_eq!(coerced.get("limit"), Some(&json!(10)));
    }

    #[test]
    fn variable_reference_in_argument() {
        let schema = test_schema();
        let operation = operation("query($id: String!) { human(id: $id) }");
        let field = first_field(&operation);
        let field_def = schema.type_field("Query", "human").unwrap();
        let mut variables = JsonMap::new();
        variables.insert("id".to_owned(), json!("2001"));
        let coerced = coerce_argument_values(&schema, field_def, &field, &variables).unwrap();
        assert_eq!(coerced.get("id"), Some(&json!("2001")));
    }

    #[test]
    fn missing_non_null_variable() {
        let schema = test_schema();
        let operation = operation("query($id: String!) { human(id: $id) }");
        let error = coerce_variable_values(&schema, &operation, &JsonMap::new()).unwrap_err();
        assert_eq!(error.message, r#"Missing value for non-null variable "id""#);
    }

    #[test]
    fn input_object_coercion() {
        let schema = test_schema();
        let operation = operation("query($p: Point) { human }");
        let mut variables = JsonMap::new();
        variables.insert("p".to_owned(), json!({"x": 1, "y": 2}));
        let coerced = coerce_variable_values(&schema, &operation, &variables).unwrap();
        assert_eq!(coerced.get("p"), Some(&json!({"x": 1, "y": 2})));

        variables.insert("p".to_owned(), json!({"x": 1}));
        let error = coerce_variable_values(&schema, &operation, &variables).unwrap_err();
        assert_eq!(
            error.message,
            "Missing value for non-null input object field Point.y"
        );

        variables.insert("p".to_owned(), json!({"x": 1, "y": 2, "z": 3}));
        let error = coerce_variable_values(&schema, &operation, &variables).unwrap_err();
        assert_eq!(error.message, "Input object has key z not in type Point");
    }

    #[test]
    fn list_input_accepts_single_value() {
        let schema = Schema::parse("type Query { f(ints: [Int]): Int }").unwrap();
        let operation = operation("query($ints: [Int]) { f(ints: $ints) }");
        let mut variables = JsonMap::new();
        variables.insert("ints".to_owned(), json!(7));
        let coerced = coerce_variable_values(&schema, &operation, &variables).unwrap();
        assert_eq!(coerced.get("ints"), Some(&json!([7])));
    }
}
