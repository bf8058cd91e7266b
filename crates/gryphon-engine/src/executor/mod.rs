//! The abstract concurrency contract execution is parameterized by.
//!
//! The execution algorithm never schedules work itself: it hands resolver
//! invocations and pending completions to an [`Executor`], which decides
//! whether they run inline, on a thread pool, or as tasks of an async
//! runtime. Three strategies are provided:
//!
//! * [`BlockingExecutor`]: fully synchronous, single-threaded.
//! * [`ThreadPoolExecutor`]: resolver invocations become jobs on a bounded
//!   worker pool.
//! * [`TokioExecutor`]: cooperative scheduling on a Tokio runtime; the only
//!   strategy that supports subscriptions.

use crate::execution::engine::Completion;
use crate::execution::engine::CompletionFuture;
use crate::execution::resolver::FieldError;
use crate::execution::resolver::ResolvedValue;
use crate::execution::resolver::ResolverJob;
use crate::execution::resolver::SourceStream;
use crate::response::Response;
use futures::future::BoxFuture;
use futures::stream::BoxStream;

mod blocking;
mod thread_pool;
mod tokio;

pub use self::blocking::BlockingExecutor;
pub use self::thread_pool::ThreadPoolExecutor;
pub use self::tokio::TokioExecutor;

/// A stream of responses, one per subscription event.
pub type ResponseStream = BoxStream<'static, Response>;

/// Turns one subscription event into a response.
pub type EventMapper =
    Box<dyn FnMut(Result<ResolvedValue, FieldError>) -> BoxFuture<'static, Response> + Send>;

/// A concurrency strategy for execution.
///
/// Implementations supply a small set of primitives; the execution
/// algorithm composes them and stays agnostic to how a value is realized.
pub trait Executor: Send + Sync {
    /// Realize one resolver invocation under this strategy's scheduling
    /// model.
    fn invoke(&self, job: ResolverJob) -> BoxFuture<'static, Result<ResolvedValue, FieldError>>;

    /// Gather pending completions, preserving input order.
    ///
    /// Produced when completing a list or the sibling fields of a selection
    /// set. A failed completion must not prevent its siblings from being
    /// observed; the execution algorithm decides error granularity.
    fn join(&self, pending: Vec<CompletionFuture>) -> BoxFuture<'static, Vec<Completion>>;

    /// Collapse a deferred computation that itself produces a deferred
    /// completion.
    fn flatten(&self, outer: BoxFuture<'static, CompletionFuture>) -> CompletionFuture;

    /// Apply a per-event transformation lazily over a subscription source
    /// stream.
    ///
    /// Only called when [`supports_subscriptions`][Self::supports_subscriptions]
    /// returns true.
    fn map_stream(&self, source: SourceStream, map: EventMapper) -> ResponseStream;

    /// Whether `subscribe` may be used with this strategy. Subscriptions
    /// fail fast with a request error otherwise.
    fn supports_subscriptions(&self) -> bool {
        false
    }
}
