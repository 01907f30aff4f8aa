//! # Task record: one unit of queued work.
//!
//! A [`TaskRecord`] bundles the params with the executor that will consume them.
//! The scheduler assigns `id` when the record is accepted; before that it is `0`.
//!
//! ## Rules
//! - A record without an executor is **malformed** and is never enqueued.
//! - A record is consumed exactly once by the dispatcher and handed to a single slot.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::executor::{BoxExecFuture, ExecutorRef};

/// One unit of work: params plus the executor that runs them.
///
/// ## Example
/// ```rust
/// use slotpool::{TaskError, TaskRecord};
///
/// let task: TaskRecord<&'static str, usize> =
///     TaskRecord::new("hello", |s: &'static str| async move { Ok::<_, TaskError>(s.len()) })
///         .with_label("measure");
///
/// assert_eq!(task.label(), Some("measure"));
/// assert!(task.has_executor());
/// ```
pub struct TaskRecord<P, R> {
    id: u64,
    label: Option<Cow<'static, str>>,
    params: P,
    executor: Option<ExecutorRef<P, R>>,
}

impl<P, R> TaskRecord<P, R> {
    /// Creates a record from params and a closure executor.
    pub fn new<F, Fut>(params: P, f: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, TaskError>> + Send + 'static,
        P: 'static,
        R: 'static,
    {
        Self::from_parts(params, Some(Arc::new(f)))
    }

    /// Creates a record from an already shared executor (or none, which makes it malformed).
    pub fn from_parts(params: P, executor: Option<ExecutorRef<P, R>>) -> Self {
        Self {
            id: 0,
            label: None,
            params,
            executor,
        }
    }

    /// Attaches a human-readable label used in logs and events.
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Scheduler-assigned sequence id (`0` until accepted).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Optional label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Task params.
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Returns `true` if the record can be executed.
    pub fn has_executor(&self) -> bool {
        self.executor.is_some()
    }

    /// Label if set, otherwise `task-<id>`; used for logging.
    pub fn display_name(&self) -> Cow<'_, str> {
        match &self.label {
            Some(l) => Cow::Borrowed(l.as_ref()),
            None => Cow::Owned(format!("task-{}", self.id)),
        }
    }

    pub(crate) fn assign_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl<P: Clone + 'static, R> TaskRecord<P, R> {
    /// Invokes the executor with a clone of the params.
    ///
    /// Fails with [`TaskError::MissingExecutor`] on a malformed record.
    pub fn invoke(&self) -> BoxExecFuture<R>
    where
        R: 'static,
    {
        match &self.executor {
            Some(exec) => exec.call(self.params.clone()),
            None => Box::pin(async { Err(TaskError::MissingExecutor) }),
        }
    }
}

impl<P: std::fmt::Debug, R> std::fmt::Debug for TaskRecord<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRecord")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("params", &self.params)
            .field("has_executor", &self.executor.is_some())
            .finish()
    }
}
