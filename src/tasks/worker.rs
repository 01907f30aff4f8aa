//! # Worker slot capability.
//!
//! A [`Worker`] is what a slot is bound to: it accepts a dispatched [`TaskRecord`] and
//! produces a result or fails asynchronously. The built-in [`Invoke`] worker simply
//! runs the task's own executor; custom workers can wrap it (add spans, limits, ...).
//!
//! A worker that cannot accept work reports it through [`Worker::ensure_ready`]. The
//! check is made right before each dispatch to that slot; a failing check fails the
//! task with [`TaskError::Configuration`] and frees the slot.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::record::TaskRecord;

/// Shared handle to a worker (`Arc<dyn Worker>`).
pub type WorkerRef<P, R> = Arc<dyn Worker<P, R>>;

/// # Asynchronous execution lane.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use slotpool::{TaskError, TaskRecord, Worker};
///
/// struct Traced;
///
/// #[async_trait]
/// impl Worker<u32, u32> for Traced {
///     async fn execute(&self, task: &TaskRecord<u32, u32>) -> Result<u32, TaskError> {
///         tracing::debug!(task = %task.display_name(), "executing");
///         task.invoke().await
///     }
/// }
/// ```
#[async_trait]
pub trait Worker<P, R>: Send + Sync + 'static
where
    P: Send + Sync + 'static,
    R: Send + 'static,
{
    /// Runs one dispatched task to settlement.
    async fn execute(&self, task: &TaskRecord<P, R>) -> Result<R, TaskError>;

    /// Checks that the worker can accept work.
    fn ensure_ready(&self) -> Result<(), TaskError> {
        Ok(())
    }

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Worker that runs the task's own executor.
#[derive(Debug, Default, Clone, Copy)]
pub struct Invoke;

impl Invoke {
    /// Returns the worker as a shared handle.
    pub fn arc<P, R>() -> WorkerRef<P, R>
    where
        P: Clone + Send + Sync + 'static,
        R: Send + 'static,
    {
        Arc::new(Invoke)
    }
}

#[async_trait]
impl<P, R> Worker<P, R> for Invoke
where
    P: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    async fn execute(&self, task: &TaskRecord<P, R>) -> Result<R, TaskError> {
        task.invoke().await
    }

    fn name(&self) -> &'static str {
        "invoke"
    }
}
