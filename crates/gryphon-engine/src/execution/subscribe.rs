//! Subscription execution: source-stream setup and per-event responses.

use crate::execution::engine::collect_fields;
use crate::execution::engine::try_nullify;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::Propagate;
use crate::execution::engine::ResponsePath;
use crate::execution::input_coercion::coerce_argument_values;
use crate::execution::input_coercion::coerce_variable_values;
use crate::execution::resolver::ResolveInfo;
use crate::execution::resolver::Resolver;
use crate::execution::result_coercion::complete_value;
use crate::execution::Execution;
use crate::executor::EventMapper;
use crate::executor::ResponseStream;
use crate::request::RequestError;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::PathSegment;
use crate::response::Response;
use gryphon_parser::ast;
use std::sync::Arc;

pub(crate) fn subscribe(
    execution: Execution,
    root_resolver: Arc<dyn Resolver>,
) -> Result<ResponseStream, Response> {
    let source = execution.document.source.clone();
    subscribe_request(execution, root_resolver).map_err(|error| {
        Response::request_error(error.into_graphql_error(source.as_deref()))
    })
}

/// Set up the source stream, then map each of its events to a response.
///
/// This is [CreateSourceEventStream()](https://spec.graphql.org/October2021/#CreateSourceEventStream())
/// followed by a lazy MapSourceToResponseEvent(): nothing of the response
/// stream runs until it is polled.
fn subscribe_request(
    execution: Execution,
    root_resolver: Arc<dyn Resolver>,
) -> Result<ResponseStream, RequestError> {
    if !execution.executor.supports_subscriptions() {
        return Err(RequestError::new(
            "The configured executor does not support subscriptions",
        ));
    }
    let operation = execution
        .document
        .get_operation(execution.operation_name.as_deref())?
        .clone();
    if operation.operation_type != ast::OperationType::Subscription {
        return Err(RequestError::new(format!(
            "Operation is a {}, not a subscription",
            operation.operation_type
        ))
        .at(operation.location()));
    }
    let root_type_name = execution
        .schema
        .root_operation(ast::OperationType::Subscription)
        .ok_or_else(|| {
            RequestError::new("Schema doesn't support subscription operation")
                .at(operation.location())
        })?;
    let root_type = execution
        .schema
        .get_object(root_type_name)
        .ok_or_else(|| {
            RequestError::new(format!(
                r#"Root operation type "{root_type_name}" is not an object type"#
            ))
        })?
        .clone();
    let variables = coerce_variable_values(&execution.schema, &operation, &execution.variables)?;
    let ctx = ExecutionContext::new(
        execution.schema.clone(),
        execution.document.clone(),
        variables,
        execution.executor.clone(),
        execution.hooks.clone(),
    );

    let grouped = collect_fields(
        &ctx,
        &root_type,
        std::slice::from_ref(&operation.selection_set),
    );
    let mut entries = grouped.into_iter();
    let (Some((response_key, fields)), None) = (entries.next(), entries.next()) else {
        return Err(RequestError::new(
            "Subscriptions must have exactly one root field",
        )
        .at(operation.location()));
    };
    let field = fields[0].clone();
    let field_definition = ctx
        .field_definition(&root_type.name, &field.name)
        .ok_or_else(|| {
            RequestError::new(format!(
                r#"Subscription type "{}" has no field "{}""#,
                root_type.name, field.name
            ))
            .at(field.location())
        })?;
    let arguments =
        coerce_argument_values(&ctx.schema, &field_definition, &field, &ctx.variables)?;

    let path = ResponsePath::root().push(PathSegment::Field(response_key.clone()));
    let info = ResolveInfo {
        schema: ctx.schema.clone(),
        document: ctx.document.clone(),
        parent_type: root_type.name.clone(),
        field: field.clone(),
        field_definition: field_definition.clone(),
        arguments,
        variables: ctx.variables.clone(),
        path: path.to_vec(),
    };
    let source_stream = root_resolver
        .resolve_stream(&info)
        .map_err(|error| RequestError::new(error.message).at(field.location()))?;

    let ty = field_definition.ty.clone();
    let location = field.location();
    let executor = ctx.executor.clone();
    // Each event gets a fresh error list: errors of one response never
    // leak into the next.
    let map: EventMapper = Box::new(move |event| {
        let ctx = ctx.clone();
        let path = path.clone();
        let ty = ty.clone();
        let fields = fields.clone();
        let response_key = response_key.clone();
        Box::pin(async move {
            ctx.clear_errors();
            let outcome = match event {
                Err(error) => {
                    ctx.field_error(error.message, &path, location, error.extensions);
                    try_nullify(&ty, Err(Propagate::Null))
                }
                Ok(value) => {
                    let completed =
                        complete_value(ctx.clone(), path, ty.clone(), fields, value).await;
                    try_nullify(&ty, completed)
                }
            };
            let data = match outcome {
                Ok(value) => {
                    let mut object = JsonMap::new();
                    object.insert(response_key, value);
                    JsonValue::Object(object)
                }
                Err(Propagate::Null) => JsonValue::Null,
                Err(Propagate::Fatal(error)) => {
                    ctx.add_error(error);
                    JsonValue::Null
                }
            };
            Response {
                errors: ctx.take_errors(),
                data: Some(data),
            }
        })
    });
    Ok(executor.map_stream(source_stream, map))
}
