//! Execution of operations against a schema: the [`Execution`] builder and
//! the algorithm behind it.

use crate::executable::ExecutableDocument;
use crate::execution::engine::execute_selection_set;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ExecutionMode;
use crate::execution::engine::Propagate;
use crate::execution::engine::ResponsePath;
use crate::execution::hooks::FieldHook;
use crate::execution::input_coercion::coerce_variable_values;
use crate::execution::resolver::Resolver;
use crate::executor::BlockingExecutor;
use crate::executor::Executor;
use crate::executor::ResponseStream;
use crate::request::RequestError;
use crate::response::GraphQLError;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::Response;
use crate::schema::Schema;
use futures::FutureExt;
use gryphon_parser::ast;
use std::sync::Arc;
use std::time::Duration;

pub(crate) mod engine;
pub(crate) mod hooks;
pub(crate) mod input_coercion;
pub(crate) mod json;
pub(crate) mod resolver;
pub(crate) mod result_coercion;
pub(crate) mod subscribe;

/// One execution of an operation from a document, configured through
/// builder methods and consumed by [`execute`][Execution::execute],
/// [`execute_blocking`][Execution::execute_blocking], or
/// [`subscribe`][Execution::subscribe].
pub struct Execution {
    schema: Arc<Schema>,
    document: Arc<ExecutableDocument>,
    operation_name: Option<String>,
    variables: JsonMap,
    executor: Arc<dyn Executor>,
    hooks: Vec<Arc<dyn FieldHook>>,
    timeout: Option<Duration>,
}

impl Execution {
    /// Execute an operation of `document` against `schema`.
    ///
    /// Defaults: the only operation of the document, no variables, the
    /// [`BlockingExecutor`] strategy, no deadline.
    pub fn new(schema: Arc<Schema>, document: Arc<ExecutableDocument>) -> Self {
        Self {
            schema,
            document,
            operation_name: None,
            variables: JsonMap::new(),
            executor: Arc::new(BlockingExecutor),
            hooks: Vec::new(),
            timeout: None,
        }
    }

    /// Which operation of the document to execute.
    /// Required when the document contains more than one.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Variable values for the request, coerced against the operation's
    /// variable definitions before execution starts.
    pub fn variables(mut self, variables: JsonMap) -> Self {
        self.variables = variables;
        self
    }

    /// The concurrency strategy to execute under.
    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// Add a hook observing every field resolution. Hooks run in the order
    /// they were added.
    pub fn hook(mut self, hook: Arc<dyn FieldHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Overall deadline for the execution. When it elapses, outstanding
    /// work is cancelled and a single timeout error is returned; completed
    /// field values are discarded.
    ///
    /// Requires executing inside a Tokio runtime. Ignored by
    /// [`execute_blocking`][Self::execute_blocking], which has no
    /// suspension point at which it could be interrupted.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Execute the operation, resolving fields starting from
    /// `root_resolver`.
    ///
    /// The returned response always has a `data` entry: `null` when a
    /// request error aborted execution or a field error propagated to the
    /// root.
    pub async fn execute(self, root_resolver: Arc<dyn Resolver>) -> Response {
        let source = self.document.source.clone();
        match self.execute_request(root_resolver).await {
            Ok(response) => response,
            Err(error) => Response::request_error(error.into_graphql_error(source.as_deref())),
        }
    }

    /// Execute on the calling thread, without an async runtime.
    ///
    /// The whole execution must complete without suspending; a resolver
    /// returning a genuinely pending future is reported as a request
    /// error. Meant for the [`BlockingExecutor`] strategy.
    pub fn execute_blocking(mut self, root_resolver: Arc<dyn Resolver>) -> Response {
        self.timeout = None;
        let source = self.document.source.clone();
        match self.execute(root_resolver).now_or_never() {
            Some(response) => response,
            None => Response::request_error(GraphQLError::new(
                "Execution did not complete synchronously",
                None,
                source.as_deref(),
            )),
        }
    }

    /// Subscribe to a subscription operation, producing one [`Response`]
    /// per source-stream event.
    ///
    /// Fails fast (with a request-error response) when the configured
    /// executor does not support subscriptions.
    pub fn subscribe(self, root_resolver: Arc<dyn Resolver>) -> Result<ResponseStream, Response> {
        subscribe::subscribe(self, root_resolver)
    }

    async fn execute_request(
        self,
        root_resolver: Arc<dyn Resolver>,
    ) -> Result<Response, RequestError> {
        let operation = self
            .document
            .get_operation(self.operation_name.as_deref())?
            .clone();
        let operation_type = operation.operation_type;
        if operation_type == ast::OperationType::Subscription {
            return Err(RequestError::new(
                "Subscription operations must be executed through subscribe",
            )
            .at(operation.location()));
        }
        let root_type_name = self.schema.root_operation(operation_type).ok_or_else(|| {
            RequestError::new(format!("Schema doesn't support {operation_type} operation"))
                .at(operation.location())
        })?;
        let root_type = self
            .schema
            .get_object(root_type_name)
            .ok_or_else(|| {
                RequestError::new(format!(
                    r#"Root operation type "{root_type_name}" is not an object type"#
                ))
            })?
            .clone();
        let variables = coerce_variable_values(&self.schema, &operation, &self.variables)?;
        let ctx = ExecutionContext::new(
            self.schema.clone(),
            self.document.clone(),
            variables,
            self.executor.clone(),
            self.hooks.clone(),
        );
        let mode = if operation_type == ast::OperationType::Mutation {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Normal
        };
        let execution = execute_selection_set(
            ctx.clone(),
            mode,
            root_type,
            root_resolver,
            ResponsePath::root(),
            vec![operation.selection_set.clone()],
        );
        let outcome = match self.timeout {
            Some(deadline) => match tokio::time::timeout(deadline, execution).await {
                Ok(outcome) => outcome,
                Err(_elapsed) => {
                    return Err(RequestError::new(format!(
                        "Execution timed out after {}ms",
                        deadline.as_millis()
                    )))
                }
            },
            None => execution.await,
        };
        let data = match outcome {
            Ok(value) => value,
            Err(Propagate::Null) => JsonValue::Null,
            Err(Propagate::Fatal(error)) => {
                ctx.add_error(error);
                JsonValue::Null
            }
        };
        Ok(Response {
            errors: ctx.take_errors(),
            data: Some(data),
        })
    }
}
