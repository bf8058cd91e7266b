//! The execution algorithm: field collection, field execution, and the
//! shared per-execution state.

use crate::executable::ExecutableDocument;
use crate::execution::hooks::FieldHook;
use crate::execution::input_coercion::coerce_argument_values;
use crate::execution::resolver::ResolveInfo;
use crate::execution::resolver::Resolver;
use crate::execution::resolver::ResolverJob;
use crate::execution::result_coercion::complete_value;
use crate::executor::Executor;
use crate::response::GraphQLError;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::PathSegment;
use crate::schema::ObjectType;
use crate::schema::Schema;
use futures::future::BoxFuture;
use gryphon_parser::ast;
use gryphon_parser::ast::Name;
use gryphon_parser::Node;
use gryphon_parser::NodeLocation;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// How a failed completion travels up the response tree.
#[derive(Debug)]
pub enum Propagate {
    /// A field error: `null` bubbles to the nearest nullable ancestor and
    /// stops there. The error itself was already recorded.
    Null,
    /// The resolver or schema contract was violated (an unserializable
    /// leaf, an impossible abstract type). Aborts the whole execution
    /// regardless of nullability.
    Fatal(GraphQLError),
}

/// The outcome of completing one value.
pub type Completion = Result<JsonValue, Propagate>;

/// A completion that may still be pending under the executor's scheduling
/// model.
pub type CompletionFuture = BoxFuture<'static, Completion>;

/// Whether sibling fields may be in flight at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    Normal,
    /// Top-level fields of a mutation resolve one at a time, in document
    /// order, so side effects never interleave. Nested selection sets go
    /// back to `Normal`.
    Sequential,
}

/// State shared by every field resolution of one execution.
///
/// The error list is the only broadly shared mutable state; it is
/// append-only during execution and lock-protected for the concurrent
/// strategies. For subscriptions the same context is reused across events,
/// with the error list cleared in between.
pub(crate) struct ExecutionContext {
    pub(crate) schema: Arc<Schema>,
    pub(crate) document: Arc<ExecutableDocument>,
    pub(crate) variables: Arc<JsonMap>,
    pub(crate) executor: Arc<dyn Executor>,
    pub(crate) hooks: Arc<[Arc<dyn FieldHook>]>,
    errors: Mutex<Vec<GraphQLError>>,
    field_definitions: Mutex<HashMap<(Name, Name), Option<Node<ast::FieldDefinition>>>>,
}

impl ExecutionContext {
    pub(crate) fn new(
        schema: Arc<Schema>,
        document: Arc<ExecutableDocument>,
        variables: JsonMap,
        executor: Arc<dyn Executor>,
        hooks: Vec<Arc<dyn FieldHook>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            schema,
            document,
            variables: Arc::new(variables),
            executor,
            hooks: hooks.into(),
            errors: Mutex::new(Vec::new()),
            field_definitions: Mutex::new(HashMap::new()),
        })
    }

    pub(crate) fn source(&self) -> Option<&str> {
        self.document.source.as_deref()
    }

    pub(crate) fn add_error(&self, error: GraphQLError) {
        self.errors.lock().push(error);
    }

    /// Record a recoverable field error at the given response path.
    pub(crate) fn field_error(
        &self,
        message: impl Into<String>,
        path: &ResponsePath,
        location: Option<NodeLocation>,
        extensions: JsonMap,
    ) {
        let mut error = GraphQLError::new(message, location, self.source());
        error.path = path.to_vec();
        error.extensions = extensions;
        self.add_error(error);
    }

    /// Build the error for an unrecoverable contract violation.
    pub(crate) fn fatal_error(
        &self,
        message: impl Into<String>,
        path: &ResponsePath,
        location: Option<NodeLocation>,
    ) -> GraphQLError {
        let mut error = GraphQLError::new(message, location, self.source());
        error.path = path.to_vec();
        error
    }

    pub(crate) fn take_errors(&self) -> Vec<GraphQLError> {
        std::mem::take(&mut *self.errors.lock())
    }

    pub(crate) fn clear_errors(&self) {
        self.errors.lock().clear();
    }

    /// Cached `(type, field) -> FieldDefinition` lookup. Racing lookups
    /// compute the same entry, so last write wins harmlessly.
    pub(crate) fn field_definition(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Option<Node<ast::FieldDefinition>> {
        let key = (type_name.to_owned(), field_name.to_owned());
        if let Some(cached) = self.field_definitions.lock().get(&key) {
            return cached.clone();
        }
        let definition = self.schema.type_field(type_name, field_name).cloned();
        self.field_definitions.lock().insert(key, definition.clone());
        definition
    }
}

/// Response-key path from the operation root to the value being completed.
///
/// Structurally persistent: `push` creates a new path sharing its prefix,
/// so concurrent fan-out never mutates a shared stack.
#[derive(Clone, Default)]
pub(crate) struct ResponsePath(Option<Arc<PathLink>>);

struct PathLink {
    segment: PathSegment,
    parent: Option<Arc<PathLink>>,
}

impl ResponsePath {
    pub(crate) fn root() -> Self {
        Self(None)
    }

    pub(crate) fn push(&self, segment: PathSegment) -> Self {
        Self(Some(Arc::new(PathLink {
            segment,
            parent: self.0.clone(),
        })))
    }

    pub(crate) fn to_vec(&self) -> Vec<PathSegment> {
        let mut segments = Vec::new();
        let mut link = self.0.as_deref();
        while let Some(current) = link {
            segments.push(current.segment.clone());
            link = current.parent.as_deref();
        }
        segments.reverse();
        segments
    }
}

/// Execute one selection set (or several merged ones contributing to the
/// same response object) against an object value.
pub(crate) fn execute_selection_set(
    ctx: Arc<ExecutionContext>,
    mode: ExecutionMode,
    object_type: Node<ObjectType>,
    object_value: Arc<dyn Resolver>,
    path: ResponsePath,
    selection_sets: Vec<Vec<ast::Selection>>,
) -> CompletionFuture {
    Box::pin(async move {
        let grouped = collect_fields(&ctx, &object_type, &selection_sets);

        enum Slot {
            Ready(JsonValue),
            Pending(usize),
        }
        let mut slots: Vec<(Name, Slot)> = Vec::with_capacity(grouped.len());
        let mut pending: Vec<CompletionFuture> = Vec::new();

        for (response_key, fields) in grouped {
            let field = &fields[0];
            if field.name == "__typename" {
                slots.push((
                    response_key,
                    Slot::Ready(object_value.type_name().into()),
                ));
                continue;
            }
            let Some(field_definition) = ctx.field_definition(&object_type.name, &field.name)
            else {
                // Unknown field: skipped silently, validation is a
                // separate pass.
                continue;
            };
            let future = execute_field(
                ctx.clone(),
                object_type.name.clone(),
                object_value.clone(),
                path.push(PathSegment::Field(response_key.clone())),
                field_definition,
                fields,
            );
            match mode {
                ExecutionMode::Sequential => {
                    slots.push((response_key, Slot::Ready(future.await?)));
                }
                ExecutionMode::Normal => {
                    slots.push((response_key, Slot::Pending(pending.len())));
                    pending.push(future);
                }
            }
        }

        let mut joined = if pending.is_empty() {
            Vec::new()
        } else {
            ctx.executor.join(pending).await
        };
        let mut object = JsonMap::new();
        for (response_key, slot) in slots {
            let value = match slot {
                Slot::Ready(value) => value,
                Slot::Pending(index) => {
                    std::mem::replace(&mut joined[index], Ok(JsonValue::Null))?
                }
            };
            object.insert(response_key, value);
        }
        Ok(JsonValue::Object(object))
    })
}

/// Execute one response key: coerce arguments, invoke the resolver through
/// the executor, then complete the resolved value against the field's
/// declared type.
pub(crate) fn execute_field(
    ctx: Arc<ExecutionContext>,
    parent_type: Name,
    object_value: Arc<dyn Resolver>,
    path: ResponsePath,
    field_definition: Node<ast::FieldDefinition>,
    fields: Vec<Node<ast::Field>>,
) -> CompletionFuture {
    let executor = ctx.executor.clone();
    // Split into a "resolve" phase and a "complete" phase so that the
    // strategy decides how the two chain.
    executor.flatten(Box::pin(async move {
        let field = fields[0].clone();
        let location = field.location();
        let ty = field_definition.ty.clone();

        let arguments =
            match coerce_argument_values(&ctx.schema, &field_definition, &field, &ctx.variables) {
                Ok(arguments) => arguments,
                Err(error) => {
                    ctx.field_error(
                        error.message,
                        &path,
                        error.location.or(location),
                        JsonMap::new(),
                    );
                    return ready(try_nullify(&ty, Err(Propagate::Null)));
                }
            };

        let info = ResolveInfo {
            schema: ctx.schema.clone(),
            document: ctx.document.clone(),
            parent_type,
            field: field.clone(),
            field_definition: field_definition.clone(),
            arguments,
            variables: ctx.variables.clone(),
            path: path.to_vec(),
        };
        for hook in ctx.hooks.iter() {
            hook.on_field_start(&info);
        }
        let resolved = ctx
            .executor
            .invoke(ResolverJob::new(object_value, info.clone()))
            .await;
        // End hooks run in reverse order, like unwinding nested scopes.
        for hook in ctx.hooks.iter().rev() {
            hook.on_field_end(&info, resolved.as_ref().map(|_| ()));
        }

        match resolved {
            Err(error) => {
                ctx.field_error(error.message, &path, location, error.extensions);
                ready(try_nullify(&ty, Err(Propagate::Null)))
            }
            Ok(value) => {
                let completion: CompletionFuture = Box::pin(async move {
                    let completed = complete_value(
                        ctx,
                        path,
                        ty.clone(),
                        fields,
                        value,
                    )
                    .await;
                    try_nullify(&ty, completed)
                });
                completion
            }
        }
    }))
}

fn ready(completion: Completion) -> CompletionFuture {
    Box::pin(futures::future::ready(completion))
}

/// Recover a propagating `null` at a nullable position; keep propagating at
/// a non-null one. Fatal failures always pass through.
pub(crate) fn try_nullify(ty: &ast::Type, completion: Completion) -> Completion {
    match completion {
        Err(Propagate::Null) if !ty.is_non_null() => Ok(JsonValue::Null),
        other => other,
    }
}

/// Merge the given selection sets into an ordered map from response key to
/// the field selections contributing to it.
///
/// Fragment spreads and inline fragments are flattened recursively when
/// their type condition applies to `object_type`; `@skip` and `@include`
/// are evaluated here, with `@skip` taking precedence. A visited set
/// guards against fragment cycles, which validation would reject but
/// execution must not loop on.
pub(crate) fn collect_fields(
    ctx: &ExecutionContext,
    object_type: &ObjectType,
    selection_sets: &[Vec<ast::Selection>],
) -> IndexMap<Name, Vec<Node<ast::Field>>> {
    let mut grouped = IndexMap::new();
    let mut visited_fragments = HashSet::new();
    for selections in selection_sets {
        collect_selections(
            ctx,
            object_type,
            selections,
            &mut visited_fragments,
            &mut grouped,
        );
    }
    grouped
}

fn collect_selections(
    ctx: &ExecutionContext,
    object_type: &ObjectType,
    selections: &[ast::Selection],
    visited_fragments: &mut HashSet<Name>,
    grouped: &mut IndexMap<Name, Vec<Node<ast::Field>>>,
) {
    for selection in selections {
        match selection {
            ast::Selection::Field(field) => {
                if skipped(&field.directives, &ctx.variables) {
                    continue;
                }
                grouped
                    .entry(field.response_key().clone())
                    .or_default()
                    .push(field.clone());
            }
            ast::Selection::FragmentSpread(spread) => {
                if skipped(&spread.directives, &ctx.variables) {
                    continue;
                }
                if !visited_fragments.insert(spread.fragment_name.clone()) {
                    continue;
                }
                // An undefined fragment is skipped like an unknown field.
                let Some(fragment) = ctx.document.fragments.get(&spread.fragment_name) else {
                    continue;
                };
                if !type_condition_applies(
                    &ctx.schema,
                    &object_type.name,
                    Some(&fragment.type_condition),
                ) {
                    continue;
                }
                collect_selections(
                    ctx,
                    object_type,
                    &fragment.selection_set,
                    visited_fragments,
                    grouped,
                );
            }
            ast::Selection::InlineFragment(inline) => {
                if skipped(&inline.directives, &ctx.variables) {
                    continue;
                }
                if !type_condition_applies(
                    &ctx.schema,
                    &object_type.name,
                    inline.type_condition.as_ref(),
                ) {
                    continue;
                }
                collect_selections(
                    ctx,
                    object_type,
                    &inline.selection_set,
                    visited_fragments,
                    grouped,
                );
            }
        }
    }
}

/// A fragment without a type condition always applies; with one, the
/// object type must be the condition itself or a possible type of it.
fn type_condition_applies(
    schema: &Schema,
    object_type_name: &str,
    condition: Option<&Name>,
) -> bool {
    match condition {
        None => true,
        Some(condition) => {
            condition == object_type_name || schema.is_subtype(condition, object_type_name)
        }
    }
}

fn skipped(directives: &[Node<ast::Directive>], variables: &JsonMap) -> bool {
    let skip = eval_if_arg(directives, "skip", variables).unwrap_or(false);
    let include = eval_if_arg(directives, "include", variables).unwrap_or(true);
    // `@skip` wins over a contradictory `@include`.
    skip || !include
}

fn eval_if_arg(
    directives: &[Node<ast::Directive>],
    directive_name: &str,
    variables: &JsonMap,
) -> Option<bool> {
    directives
        .iter()
        .find(|directive| directive.name == directive_name)?
        .argument_by_name("if")
        .and_then(|value| match value.as_ref() {
            ast::Value::Boolean(value) => Some(*value),
            ast::Value::Variable(name) => variables.get(name.as_str())?.as_bool(),
            _ => None,
        })
}
