//! # Function-backed executors.
//!
//! An [`Executor`] is the capability carried by a task: it takes the task's params
//! and produces a fresh future per call. Any `Fn(P) -> Fut` closure is an executor.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use slotpool::{ExecutorRef, TaskError};
//!
//! let double: ExecutorRef<u32, u32> = Arc::new(|n: u32| async move {
//!     Ok::<_, TaskError>(n * 2)
//! });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::TaskError;

/// Boxed future returned by [`Executor::call`].
pub type BoxExecFuture<R> = Pin<Box<dyn Future<Output = Result<R, TaskError>> + Send + 'static>>;

/// Shared handle to an executor.
pub type ExecutorRef<P, R> = Arc<dyn Executor<P, R>>;

/// Asynchronous capability `(params) -> result`, failing with [`TaskError`].
pub trait Executor<P, R>: Send + Sync + 'static {
    /// Starts one execution. Each call creates a new future that owns its params.
    fn call(&self, params: P) -> BoxExecFuture<R>;
}

impl<F, Fut, P, R> Executor<P, R> for F
where
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, TaskError>> + Send + 'static,
{
    fn call(&self, params: P) -> BoxExecFuture<R> {
        Box::pin((self)(params))
    }
}
