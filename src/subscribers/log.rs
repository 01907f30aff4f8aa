//! # LogWriter: event printer
//!
//! A subscriber that renders incoming [`Event`]s through `tracing`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG slotpool::log: started
//! TRACE slotpool::log: dispatched task="resize" id=1 slot=0
//! INFO  slotpool::log: succeeded task="resize" id=1 slot=0
//! WARN  slotpool::log: failed task="fetch" id=2 slot=1 err="execution failed: 503"
//! DEBUG slotpool::log: stopped reason="drained"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::SchedulerStarted => {
                tracing::debug!(target: "slotpool::log", "started");
            }
            EventKind::SchedulerStopped => {
                tracing::debug!(target: "slotpool::log", reason, "stopped");
            }
            EventKind::Drained => {
                tracing::debug!(target: "slotpool::log", "drained");
            }
            EventKind::TaskQueued => {
                tracing::trace!(target: "slotpool::log", task, id = ?e.task_id, "queued");
            }
            EventKind::TaskRejected => {
                tracing::warn!(target: "slotpool::log", task, reason, "rejected");
            }
            EventKind::TaskDispatched => {
                tracing::trace!(target: "slotpool::log", task, id = ?e.task_id, slot = ?e.slot, "dispatched");
            }
            EventKind::TaskSucceeded => {
                tracing::info!(target: "slotpool::log", task, id = ?e.task_id, slot = ?e.slot, "succeeded");
            }
            EventKind::TaskFailed => {
                tracing::warn!(target: "slotpool::log", task, id = ?e.task_id, slot = ?e.slot, err = reason, "failed");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "slotpool::log", subscriber = task, reason, "subscriber-overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(target: "slotpool::log", subscriber = task, info = reason, "subscriber-panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
