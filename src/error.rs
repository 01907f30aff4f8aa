//! Error types used by the slotpool scheduler and its tasks.
//!
//! This module defines two main error enums:
//!
//! - [`SchedulerError`]: errors raised by the scheduler itself (construction, closed handle).
//! - [`TaskError`]: per-task failure causes, delivered only through the error callback.
//!
//! Both types provide `as_label` for logs/metrics. Per-task errors never stop the
//! dispatcher: they are contained and reported as [`TaskFailure`].

use thiserror::Error;

use crate::tasks::TaskRecord;

/// # Errors produced by the scheduler.
///
/// Construction-time misconfiguration is the only failure during normal operation;
/// `Closed` is returned when the control loop is gone.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Worker set is missing or empty.
    #[error("configuration error: {reason}")]
    Configuration {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The control loop has exited; the handle can no longer be used.
    #[error("scheduler closed")]
    Closed,
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use slotpool::SchedulerError;
    ///
    /// let err = SchedulerError::Configuration { reason: "no workers".into() };
    /// assert_eq!(err.as_label(), "scheduler_configuration");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::Configuration { .. } => "scheduler_configuration",
            SchedulerError::Closed => "scheduler_closed",
        }
    }
}

/// # Errors produced by task execution.
///
/// Each settled task yields exactly one outcome; a `TaskError` is never propagated
/// into the scheduler's own control flow.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The executor rejected.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The slot the task was dispatched to cannot run work.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Why the slot is unusable.
        reason: String,
    },

    /// The record has no executor to invoke.
    #[error("task has no executor")]
    MissingExecutor,

    /// The executor panicked; the panic was caught.
    #[error("executor panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use slotpool::TaskError;
    ///
    /// assert_eq!(TaskError::fail("boom").as_label(), "task_failed");
    /// assert_eq!(TaskError::MissingExecutor.as_label(), "task_missing_executor");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Configuration { .. } => "task_configuration",
            TaskError::MissingExecutor => "task_missing_executor",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Configuration { reason } => format!("configuration: {reason}"),
            TaskError::MissingExecutor => "missing executor".to_string(),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// Payload of the error callback: the failed task together with its cause.
pub struct TaskFailure<P, R> {
    /// The task that failed.
    pub task: TaskRecord<P, R>,
    /// Why it failed.
    pub cause: TaskError,
}

impl<P, R> std::fmt::Debug for TaskFailure<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFailure")
            .field("task", &self.task.id())
            .field("label", &self.task.label())
            .field("cause", &self.cause)
            .finish()
    }
}
