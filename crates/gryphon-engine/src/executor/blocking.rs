//! The synchronous strategy: no deferredness, no suspension points.

use crate::execution::engine::Completion;
use crate::execution::engine::CompletionFuture;
use crate::execution::resolver::FieldError;
use crate::execution::resolver::ResolvedValue;
use crate::execution::resolver::ResolverJob;
use crate::execution::resolver::SourceStream;
use crate::executor::EventMapper;
use crate::executor::Executor;
use crate::executor::ResponseStream;
use futures::future::BoxFuture;

/// Runs everything in the calling thread.
///
/// Concurrent fan-out degenerates to sequential iteration, so results and
/// recorded errors are fully deterministic. The whole execution is expected
/// to complete without suspending; resolvers returning genuinely pending
/// futures surface as a request error from
/// [`Execution::execute_blocking`][crate::Execution::execute_blocking].
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockingExecutor;

impl Executor for BlockingExecutor {
    fn invoke(&self, job: ResolverJob) -> BoxFuture<'static, Result<ResolvedValue, FieldError>> {
        job.run()
    }

    fn join(&self, pending: Vec<CompletionFuture>) -> BoxFuture<'static, Vec<Completion>> {
        Box::pin(futures::future::join_all(pending))
    }

    fn flatten(&self, outer: BoxFuture<'static, CompletionFuture>) -> CompletionFuture {
        Box::pin(async move { outer.await.await })
    }

    fn map_stream(&self, _source: SourceStream, _map: EventMapper) -> ResponseStream {
        // Unreachable: `subscribe` fails fast when
        // `supports_subscriptions` is false.
        Box::pin(futures::stream::empty())
    }
}
