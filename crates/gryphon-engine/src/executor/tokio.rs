//! The cooperative strategy: execution as tasks of a Tokio runtime.

use crate::execution::engine::Completion;
use crate::execution::engine::CompletionFuture;
use crate::execution::engine::Propagate;
use crate::execution::resolver::FieldError;
use crate::execution::resolver::ResolvedValue;
use crate::execution::resolver::ResolverJob;
use crate::execution::resolver::SourceStream;
use crate::executor::EventMapper;
use crate::executor::Executor;
use crate::executor::ResponseStream;
use crate::response::GraphQLError;
use futures::future::BoxFuture;
use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Schedules resolver invocations and sibling completions as Tokio tasks.
///
/// Async resolvers are spawned so they run concurrently and can be
/// cancelled; resolvers that declare themselves blocking are off-loaded to
/// the runtime's blocking worker threads so they do not stall the event
/// loop. Dropping an execution future (for instance when a deadline
/// elapses) aborts all of its outstanding tasks.
///
/// This is the only strategy that supports subscriptions.
#[derive(Clone, Debug)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    /// Capture the current runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime,
    /// like [`Handle::current`].
    pub fn new() -> Self {
        Self {
            handle: Handle::current(),
        }
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Default for TokioExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for TokioExecutor {
    fn invoke(&self, job: ResolverJob) -> BoxFuture<'static, Result<ResolvedValue, FieldError>> {
        if job.is_blocking() {
            let task = self.handle.spawn_blocking(move || {
                futures::executor::block_on(job.run())
            });
            Box::pin(async move {
                task.await.unwrap_or_else(|error| {
                    Err(FieldError::new(format!("resolver task failed: {error}")))
                })
            })
        } else {
            let task = self.handle.spawn(job.run());
            let abort = task.abort_handle();
            let guard = AbortOnDrop::new(vec![abort]);
            Box::pin(async move {
                let result = task.await.unwrap_or_else(|error| {
                    Err(FieldError::new(format!("resolver task failed: {error}")))
                });
                guard.disarm();
                result
            })
        }
    }

    fn join(&self, pending: Vec<CompletionFuture>) -> BoxFuture<'static, Vec<Completion>> {
        let tasks: Vec<_> = pending
            .into_iter()
            .map(|completion| self.handle.spawn(completion))
            .collect();
        let guard = AbortOnDrop::new(tasks.iter().map(|task| task.abort_handle()).collect());
        Box::pin(async move {
            let mut outcomes = Vec::with_capacity(tasks.len());
            for task in tasks {
                outcomes.push(task.await.unwrap_or_else(|error| {
                    Err(Propagate::Fatal(GraphQLError::new(
                        format!("execution task failed: {error}"),
                        None,
                        None,
                    )))
                }));
            }
            guard.disarm();
            outcomes
        })
    }

    fn flatten(&self, outer: BoxFuture<'static, CompletionFuture>) -> CompletionFuture {
        Box::pin(async move { outer.await.await })
    }

    fn map_stream(&self, source: SourceStream, mut map: EventMapper) -> ResponseStream {
        Box::pin(source.then(move |event| map(event)))
    }

    fn supports_subscriptions(&self) -> bool {
        true
    }
}

/// Aborts the guarded tasks unless disarmed, so that dropping a pending
/// execution future cancels its outstanding work instead of leaking it.
struct AbortOnDrop {
    handles: Vec<AbortHandle>,
    armed: bool,
}

impl AbortOnDrop {
    fn new(handles: Vec<AbortHandle>) -> Self {
        Self {
            handles,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if self.armed {
            for handle in &self.handles {
                handle.abort();
            }
        }
    }
}
