//! # Task abstractions.
//!
//! This module provides the task-related types:
//! - [`TaskRecord`] - one unit of queued work (params + executor)
//! - [`Executor`] - a task's capability `(params) -> result`; implemented for closures
//! - [`Worker`] - a slot's capability; [`Invoke`] runs the task's own executor

mod executor;
mod record;
mod worker;

pub use executor::{BoxExecFuture, Executor, ExecutorRef};
pub use record::TaskRecord;
pub use worker::{Invoke, Worker, WorkerRef};
