//! # Runtime events emitted by the scheduler.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: the scheduler started polling, stopped, or drained
//! - **Task events**: queued, rejected, dispatched to a slot, succeeded, failed
//! - **Subscriber events**: overflow and panic inside observers
//!
//! The [`Event`] struct carries metadata such as timestamps, task id/name, slot index and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Events published by the control loop are published in the order things happened, so
//! `TaskDispatched` events reflect the exact dispatch order.
//!
//! ## Example
//! ```rust
//! use slotpool::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskDispatched)
//!     .with_task(3, "resize")
//!     .with_slot(1);
//!
//! assert_eq!(ev.kind, EventKind::TaskDispatched);
//! assert_eq!(ev.task_id, Some(3));
//! assert_eq!(ev.slot, Some(1));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// Polling started (`Stopped → Running`).
    SchedulerStarted,

    /// Polling stopped (drain or explicit stop).
    ///
    /// Sets:
    /// - `reason`: `"drained"` or `"stop_requested"`
    SchedulerStopped,

    /// Queue and busy set are both empty; the drained callback fired.
    Drained,

    // === Task events ===
    /// Task accepted into the queue.
    ///
    /// Sets:
    /// - `task_id`, `task`
    TaskQueued,

    /// Malformed submission dropped (not enqueued).
    ///
    /// Sets:
    /// - `task`: label, if any
    /// - `reason`: why it was dropped
    TaskRejected,

    /// Task bound to a slot.
    ///
    /// Sets:
    /// - `task_id`, `task`
    /// - `slot`: slot index
    TaskDispatched,

    /// Task settled with a result.
    ///
    /// Sets:
    /// - `task_id`, `task`, `slot`
    TaskSucceeded,

    /// Task settled with an error.
    ///
    /// Sets:
    /// - `task_id`, `task`, `slot`
    /// - `reason`: error message
    TaskFailed,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Scheduler-assigned task id, if applicable.
    pub task_id: Option<u64>,
    /// Task display name (or subscriber name for subscriber events).
    pub task: Option<Arc<str>>,
    /// Slot index, if applicable.
    pub slot: Option<usize>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task_id: None,
            task: None,
            slot: None,
            reason: None,
        }
    }

    /// Attaches a task id and display name.
    #[inline]
    pub fn with_task(mut self, id: u64, name: impl Into<Arc<str>>) -> Self {
        self.task_id = Some(id);
        self.task = Some(name.into());
        self
    }

    /// Attaches a name without an id.
    #[inline]
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.task = Some(name.into());
        self
    }

    /// Attaches a slot index.
    #[inline]
    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_name(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_name(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
