//! The contract between the engine and application code: the [`Resolver`]
//! trait, the values it produces, and the errors it raises.

use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::PathSegment;
use crate::schema::Schema;
use crate::ExecutableDocument;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use gryphon_parser::ast;
use indexmap::IndexMap;
use std::sync::Arc;

/// The stream of events produced by a subscription root field.
pub type SourceStream = BoxStream<'static, Result<ResolvedValue, FieldError>>;

/// Abstraction for a value that can resolve fields: the root of an
/// operation, or any non-leaf value nested in a response.
///
/// Resolution is asynchronous. A synchronous resolver simply returns an
/// already-ready future; under the blocking strategy the whole execution is
/// expected to complete without ever suspending.
pub trait Resolver: Send + Sync {
    /// Name of the concrete object type this value belongs to.
    ///
    /// Used to resolve the `__typename` meta-field and to pick the concrete
    /// type when the field's declared type is an interface or union.
    fn type_name(&self) -> &str;

    /// Resolve one field of this value.
    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>>;

    /// Resolve the source stream for a subscription root field.
    fn resolve_stream(&self, info: &ResolveInfo) -> Result<SourceStream, FieldError> {
        Err(FieldError::new(format!(
            "Subscription field \"{}\" did not provide a source stream",
            info.field_name()
        )))
    }

    /// Hint that `resolve_field` performs blocking work. The async strategy
    /// off-loads such resolvers to blocking worker threads so they do not
    /// stall the event loop.
    fn is_blocking(&self) -> bool {
        false
    }
}

/// The value of a resolved field, before completion against its declared
/// type.
pub enum ResolvedValue {
    /// A scalar or enum value, or an explicit null.
    Leaf(JsonValue),
    /// A value with fields of its own.
    Object(Arc<dyn Resolver>),
    /// A list; each item is completed against the list's item type.
    List(Vec<ResolvedValue>),
}

impl ResolvedValue {
    pub fn null() -> Self {
        Self::Leaf(JsonValue::Null)
    }

    pub fn leaf(value: impl Into<JsonValue>) -> Self {
        Self::Leaf(value.into())
    }

    pub fn object(resolver: impl Resolver + 'static) -> Self {
        Self::Object(Arc::new(resolver))
    }

    pub fn list(items: impl IntoIterator<Item = ResolvedValue>) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Leaf(JsonValue::Null))
    }
}

/// An error raised by a resolver or by argument coercion.
///
/// Field errors are recoverable: the field's value becomes `null`, the error
/// is recorded with its response path, and sibling fields are unaffected.
#[derive(Clone, Debug)]
pub struct FieldError {
    pub(crate) message: String,
    pub(crate) extensions: JsonMap,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: JsonMap::new(),
        }
    }

    /// Attach a map serialized verbatim under the error's `extensions` key.
    pub fn with_extensions(mut self, extensions: JsonMap) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<E: std::error::Error> From<E> for FieldError {
    fn from(error: E) -> Self {
        Self::new(error.to_string())
    }
}

/// Read-only snapshot of everything a resolver may need about the field
/// being resolved.
#[derive(Clone)]
pub struct ResolveInfo {
    pub(crate) schema: Arc<Schema>,
    pub(crate) document: Arc<ExecutableDocument>,
    pub(crate) parent_type: ast::Name,
    pub(crate) field: gryphon_parser::Node<ast::Field>,
    pub(crate) field_definition: gryphon_parser::Node<ast::FieldDefinition>,
    pub(crate) arguments: JsonMap,
    pub(crate) variables: Arc<JsonMap>,
    pub(crate) path: Vec<PathSegment>,
}

impl ResolveInfo {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The fragments of the document being executed.
    pub fn fragments(&self) -> &IndexMap<ast::Name, gryphon_parser::Node<ast::FragmentDefinition>> {
        &self.document.fragments
    }

    /// Name of the object type the field is resolved on.
    pub fn parent_type(&self) -> &str {
        &self.parent_type
    }

    /// The field selection being resolved. When several selections merged
    /// into one response key, this is the first of them.
    pub fn field(&self) -> &ast::Field {
        &self.field
    }

    pub fn field_name(&self) -> &str {
        &self.field.name
    }

    pub fn field_definition(&self) -> &ast::FieldDefinition {
        &self.field_definition
    }

    /// Argument values coerced against the field definition.
    pub fn arguments(&self) -> &JsonMap {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&JsonValue> {
        self.arguments.get(name)
    }

    pub fn variables(&self) -> &JsonMap {
        &self.variables
    }

    /// Response-key path from the operation root to this field.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }
}

/// One resolver invocation, packaged so an [`Executor`][crate::Executor]
/// strategy can schedule it: run inline, submit it to a thread pool, or
/// spawn it as a task.
pub struct ResolverJob {
    resolver: Arc<dyn Resolver>,
    info: ResolveInfo,
}

impl ResolverJob {
    pub(crate) fn new(resolver: Arc<dyn Resolver>, info: ResolveInfo) -> Self {
        Self { resolver, info }
    }

    pub fn is_blocking(&self) -> bool {
        self.resolver.is_blocking()
    }

    /// Run the resolver. The returned future owns the job.
    pub fn run(self) -> BoxFuture<'static, Result<ResolvedValue, FieldError>> {
        Box::pin(async move { self.resolver.resolve_field(&self.info).await })
    }
}

impl std::fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
            Self::Object(resolver) => {
                f.debug_tuple("Object").field(&resolver.type_name()).finish()
            }
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}
