#![doc = include_str!("../README.md")]

pub mod executable;
mod execution;
pub mod executor;
mod request;
mod response;
pub mod schema;

pub use self::executable::ExecutableDocument;
pub use self::execution::engine::Completion;
pub use self::execution::engine::CompletionFuture;
pub use self::execution::engine::Propagate;
pub use self::execution::hooks::FieldHook;
pub use self::execution::json::JsonObject;
pub use self::execution::resolver::FieldError;
pub use self::execution::resolver::ResolveInfo;
pub use self::execution::resolver::ResolvedValue;
pub use self::execution::resolver::Resolver;
pub use self::execution::resolver::ResolverJob;
pub use self::execution::resolver::SourceStream;
pub use self::execution::Execution;
pub use self::executor::BlockingExecutor;
pub use self::executor::EventMapper;
pub use self::executor::Executor;
pub use self::executor::ResponseStream;
pub use self::executor::ThreadPoolExecutor;
pub use self::executor::TokioExecutor;
pub use self::request::RequestError;
pub use self::response::GraphQLError;
pub use self::response::GraphQLLocation;
pub use self::response::JsonMap;
pub use self::response::JsonValue;
pub use self::response::PathSegment;
pub use self::response::Response;
pub use self::schema::Schema;
