//! The thread-pool strategy: resolver invocations become jobs on a bounded
//! worker pool.

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

/// Submits each resolver invocation to a bounded rayon pool.
///
/// Workers run the resolver to completion and deliver the result through a
/// oneshot channel, so completions chain without a worker ever blocking on
/// another worker's output. Nested submissions (list items resolving more
/// fields) therefore cannot exhaust the pool into a deadlock.
///
/// The engine-side plumbing (gather, flatten) stays cooperative in the
/// caller's task; only resolver bodies run on the pool.
pub struct ThreadPoolExecutor {
    pool: rayon::ThreadPool,
}

impl ThreadPoolExecutor {
    /// Build a pool with the given number of worker threads.
    pub fn new(num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("gryphon-worker-{index}"))
            .build()?;
        Ok(Self { pool })
    }
}

impl Executor for ThreadPoolExecutor {
    fn invoke(&self, job: ResolverJob) -> BoxFuture<'static, Result<ResolvedValue, FieldError>> {
        let (sender, receiver) = futures::channel::oneshot::channel();
        self.pool.spawn(move || {
            // The resolver's own future is self-contained user work, it
            // never re-enters the engine, so driving it here cannot
            // deadlock the pool.
            let result = futures::executor::block_on(job.run());
            // The receiver may have been dropped by a cancelled execution.
            let _ = sender.send(result);
        });
        Box::pin(async move {
            receiver.await.unwrap_or_else(|_cancelled| {
                Err(FieldError::new("resolver worker dropped before completing"))
            })
        })
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
