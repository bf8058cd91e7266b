//! Completion of resolved values against the field's declared type:
//! null checks, list fan-out, leaf serialization, and concrete-type
//! selection for abstract types.

use crate::execution::engine::execute_selection_set;
use crate::execution::engine::try_nullify;
use crate::execution::engine::Completion;
use crate::execution::engine::CompletionFuture;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ExecutionMode;
use crate::execution::engine::Propagate;
use crate::execution::engine::ResponsePath;
use crate::execution::resolver::ResolvedValue;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::PathSegment;
use crate::schema::ExtendedType;
use gryphon_parser::ast;
use gryphon_parser::Node;
use gryphon_parser::NodeLocation;
use std::sync::Arc;

/// Complete a resolved value against its declared type.
///
/// This is [CompleteValue()](https://spec.graphql.org/October2021/#CompleteValue())
/// in the GraphQL specification. Recoverable failures are recorded and
/// propagate as [`Propagate::Null`]; contract violations (an unserializable
/// leaf, an impossible concrete type) are [`Propagate::Fatal`].
pub(crate) fn complete_value(
    ctx: Arc<ExecutionContext>,
    path: ResponsePath,
    ty: ast::Type,
    fields: Vec<Node<ast::Field>>,
    value: ResolvedValue,
) -> CompletionFuture {
    Box::pin(async move {
        let location = fields[0].location();

        if value.is_null() {
            if ty.is_non_null() {
                ctx.field_error(
                    format!("non-null type {ty} resolved to null"),
                    &path,
                    location,
                    JsonMap::new(),
                );
                return Err(Propagate::Null);
            }
            return Ok(JsonValue::Null);
        }

        if ty.is_list() {
            let ResolvedValue::List(items) = value else {
                ctx.field_error(
                    format!("list type {ty} resolved to a non-list value"),
                    &path,
                    location,
                    JsonMap::new(),
                );
                return Err(Propagate::Null);
            };
            let item_ty = ty.item_type();
            let mut pending = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                pending.push(complete_value(
                    ctx.clone(),
                    path.push(PathSegment::ListIndex(index)),
                    item_ty.clone(),
                    fields.clone(),
                    item,
                ));
            }
            // Slow items don't block fast ones, but all must complete
            // before the list is reported.
            let outcomes = ctx.executor.join(pending).await;
            let mut list = Vec::with_capacity(outcomes.len());
            for outcome in outcomes {
                list.push(try_nullify(item_ty, outcome)?);
            }
            return Ok(JsonValue::Array(list));
        }

        let ty_name = ty.inner_named_type();
        let Some(ty_def) = ctx.schema.types.get(ty_name) else {
            return Err(Propagate::Fatal(ctx.fatal_error(
                format!(r#"Undefined type "{ty_name}""#),
                &path,
                location,
            )));
        };
        match ty_def {
            ExtendedType::Scalar(_) | ExtendedType::Enum(_) => {
                let ResolvedValue::Leaf(value) = value else {
                    return Err(Propagate::Fatal(ctx.fatal_error(
                        format!(r#"Resolver returned a composite value for leaf type "{ty_name}""#),
                        &path,
                        location,
                    )));
                };
                complete_leaf_value(&ctx, &path, ty_name, ty_def, value, location)
            }
            ExtendedType::Object(object_type) => {
                let ResolvedValue::Object(resolver) = value else {
                    return Err(Propagate::Fatal(ctx.fatal_error(
                        format!(r#"Resolver returned a leaf value for object type "{ty_name}""#),
                        &path,
                        location,
                    )));
                };
                let selection_sets = fields
                    .iter()
                    .map(|field| field.selection_set.clone())
                    .collect();
                execute_selection_set(
                    ctx.clone(),
                    ExecutionMode::Normal,
                    object_type.clone(),
                    resolver,
                    path,
                    selection_sets,
                )
                .await
            }
            ExtendedType::Interface(_) | ExtendedType::Union(_) => {
                let ResolvedValue::Object(resolver) = value else {
                    return Err(Propagate::Fatal(ctx.fatal_error(
                        format!(
                            r#"Resolver returned a leaf value for abstract type "{ty_name}""#
                        ),
                        &path,
                        location,
                    )));
                };
                // The resolved object names its own concrete type; the
                // schema is the arbiter of whether that type is a valid
                // member of the abstract type.
                let concrete = resolver.type_name().to_owned();
                if !ctx.schema.is_subtype(ty_name, &concrete) {
                    return Err(Propagate::Fatal(ctx.fatal_error(
                        format!(
                            r#"Resolved type "{concrete}" is not a possible type of "{ty_name}""#
                        ),
                        &path,
                        location,
                    )));
                }
                let Some(object_type) = ctx.schema.get_object(&concrete) else {
                    return Err(Propagate::Fatal(ctx.fatal_error(
                        format!(r#"Resolved type "{concrete}" is not an object type"#),
                        &path,
                        location,
                    )));
                };
                let object_type = object_type.clone();
                let selection_sets = fields
                    .iter()
                    .map(|field| field.selection_set.clone())
                    .collect();
                execute_selection_set(
                    ctx.clone(),
                    ExecutionMode::Normal,
                    object_type,
                    resolver,
                    path,
                    selection_sets,
                )
                .await
            }
            ExtendedType::InputObject(_) => Err(Propagate::Fatal(ctx.fatal_error(
                format!(r#"Input object type "{ty_name}" in output position"#),
                &path,
                location,
            ))),
        }
    })
}

/// Serialize a leaf value, checking it against the built-in scalar types
/// and enum membership. Custom scalars pass through as resolved.
///
/// A value that does not serialize indicates a resolver or schema bug, not
/// bad user input, so it escalates to a fatal error rather than being
/// recorded and nulled.
fn complete_leaf_value(
    ctx: &ExecutionContext,
    path: &ResponsePath,
    ty_name: &str,
    ty_def: &ExtendedType,
    value: JsonValue,
    location: Option<NodeLocation>,
) -> Completion {
    let serializable = match ty_def {
        ExtendedType::Enum(enum_def) => value
            .as_str()
            .is_some_and(|value| enum_def.values.contains_key(value)),
        ExtendedType::Scalar(_) => match ty_name {
            "Int" => value
                .as_i64()
                .is_some_and(|value| i32::try_from(value).is_ok()),
            "Float" => value.is_f64() || value.is_i64(),
            "String" => value.is_string(),
            "Boolean" => value.is_boolean(),
            "ID" => value.is_string() || value.is_i64(),
            // Custom scalar: serialized as resolved.
            _ => true,
        },
        _ => true,
    };
    if serializable {
        Ok(value)
    } else {
        Err(Propagate::Fatal(ctx.fatal_error(
            format!(r#"Could not serialize value {value} as leaf type "{ty_name}""#),
            path,
            location,
        )))
    }
}
