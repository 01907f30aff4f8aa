//! # slotpool
//!
//! **Slotpool** is a bounded-worker FIFO task scheduler for Tokio.
//!
//! Tasks (a parameter value plus an async executor) are queued in submission order and
//! dispatched onto a fixed pool of worker slots. At most one task runs per slot, so at
//! most `N` tasks run at once. Each finished task fires exactly one of the `SUCCESS` or
//! `ERROR` callbacks; when the queue is empty and every slot is idle the scheduler stops
//! on its own and fires `END` once.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  submit(task | batch)        start() / stop()           register_callback()
//!          │                          │                           │
//!          ▼                          ▼                           ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Control loop (single owner, driven by mpsc<Command>)                 │
//! │  - TaskQueue       (FIFO of pending records)                          │
//! │  - WorkerRegistry  (ordered slots, Idle / Busy)                       │
//! │  - EventHub        (SUCCESS / ERROR / END callbacks)                  │
//! │  - Lifecycle       (Stopped / Running + ticker)                       │
//! └──────┬───────────────────────────────┬────────────────────────────────┘
//!        │ tick: lowest free slot        │ Settled { slot, task, outcome }
//!        │       × queue head            │
//!        ▼                               │
//!   ┌──────────┐   ┌──────────┐          │
//!   │ slot 0   │   │ slot 1   │  ...  ───┘
//!   │ execute  │   │ execute  │
//!   └──────────┘   └──────────┘
//!        │
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                    Bus (broadcast channel of Event)                   │
//! └─────────────────────────────────┬─────────────────────────────────────┘
//!                                   ▼
//!                            SubscriberSet
//!                           (per-sub queues)
//! ```
//!
//! ### Lifecycle
//! ```text
//! Stopped ──submit / start (work pending)──► Running
//! Running ──stop()─────────────────────────► Stopped   (no END)
//! Running ──queue empty & all slots idle───► Stopped   (END fires once)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Scheduling**    | Submit tasks, start and stop dispatch, inspect status.       | [`Scheduler`], [`SchedulerBuilder`]        |
//! | **Tasks**         | Parameter plus executor, optional label.                     | [`TaskRecord`], [`Executor`]               |
//! | **Workers**       | Ordered pool of execution slots.                             | [`Worker`], [`Invoke`], [`pool_of`]        |
//! | **Callbacks**     | `SUCCESS`, `ERROR` and `END` notifications.                  | [`Handler`], [`EventName`]                 |
//! | **Subscriber API**| Observe scheduler events (logging, metrics, custom).         | [`Subscribe`], [`Event`]                   |
//! | **Errors**        | Typed construction and task errors.                          | [`SchedulerError`], [`TaskError`]          |
//! | **Configuration** | Poll interval and bus capacity.                              | [`SchedulerConfig`]                        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber backed by `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use slotpool::{Handler, Scheduler, SchedulerConfig, TaskError, TaskRecord};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn slotpool::Subscribe>> = vec![Arc::new(slotpool::LogWriter::default())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn slotpool::Subscribe>> = Vec::new();
//!
//!     let sched = Scheduler::<String, usize>::builder(slotpool::pool_of(2))
//!         .with_config(SchedulerConfig::default())
//!         .with_subscribers(subs)
//!         .build()?;
//!
//!     let (tx, rx) = tokio::sync::oneshot::channel();
//!     let mut tx = Some(tx);
//!     sched.register_callback("END", Handler::end(move || {
//!         if let Some(tx) = tx.take() {
//!             let _ = tx.send(());
//!         }
//!     }))?;
//!
//!     let words = ["alpha", "beta", "gamma"].map(|w| {
//!         TaskRecord::new(w.to_string(), |w: String| async move { Ok::<_, TaskError>(w.len()) })
//!             .with_label(w)
//!     });
//!     sched.submit(Vec::from(words))?;
//!
//!     rx.await?;
//!     Ok(())
//! }
//! ```
mod callbacks;
mod core;
mod error;
mod events;
mod pool;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use callbacks::{EventName, Handler, TaskSuccess, UnknownEventName};
pub use core::{
    Scheduler, SchedulerBuilder, SchedulerConfig, SchedulerState, Status, Submission, pool_of,
};
pub use error::{SchedulerError, TaskError, TaskFailure};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxExecFuture, Executor, ExecutorRef, Invoke, TaskRecord, Worker, WorkerRef};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
