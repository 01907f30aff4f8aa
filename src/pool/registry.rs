//! # Worker registry: fixed set of slots and their busy state.
//!
//! Slots are identified by index `0..N`, fixed at construction. Each slot is either
//! idle or bound to exactly one in-flight task.
//!
//! ## Rules
//! - At most one busy assignment per slot; busy indices are always valid indices.
//! - Free slots are reported in ascending index order (lowest free index first).
//! - `release` on an idle slot is a no-op.

use std::time::{Duration, Instant};

use crate::error::SchedulerError;
use crate::tasks::WorkerRef;

/// Status of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotStatus {
    /// Ready to accept a task.
    Idle,

    /// Bound to an in-flight task.
    Busy {
        /// Id of the bound task.
        task: u64,
        /// When the task was dispatched.
        since: Instant,
    },
}

/// A worker bound to a slot index, plus its status.
struct Slot<P, R> {
    worker: WorkerRef<P, R>,
    status: SlotStatus,
}

/// Ordered set of worker slots.
pub(crate) struct WorkerRegistry<P, R> {
    slots: Vec<Slot<P, R>>,
}

impl<P, R> WorkerRegistry<P, R> {
    /// Builds the registry; an empty worker set is a configuration error.
    pub fn new(workers: Vec<WorkerRef<P, R>>) -> Result<Self, SchedulerError> {
        if workers.is_empty() {
            return Err(SchedulerError::Configuration {
                reason: "worker set is empty".to_string(),
            });
        }
        let slots = workers
            .into_iter()
            .map(|worker| Slot {
                worker,
                status: SlotStatus::Idle,
            })
            .collect();
        Ok(Self { slots })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Indices of idle slots, ascending.
    pub fn free_slot_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status == SlotStatus::Idle)
            .map(|(i, _)| i)
            .collect()
    }

    /// Worker bound to `index`.
    pub fn worker(&self, index: usize) -> Option<&WorkerRef<P, R>> {
        self.slots.get(index).map(|s| &s.worker)
    }

    /// Marks `index` busy with `task`. Returns `false` if the slot is unknown or already busy.
    pub fn reserve(&mut self, index: usize, task: u64) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.status == SlotStatus::Idle => {
                slot.status = SlotStatus::Busy {
                    task,
                    since: Instant::now(),
                };
                true
            }
            _ => false,
        }
    }

    /// Marks `index` idle. Returns the released task id and how long the slot was busy,
    /// or `None` if it was not busy.
    pub fn release(&mut self, index: usize) -> Option<(u64, Duration)> {
        let slot = self.slots.get_mut(index)?;
        match std::mem::replace(&mut slot.status, SlotStatus::Idle) {
            SlotStatus::Busy { task, since } => Some((task, since.elapsed())),
            SlotStatus::Idle => None,
        }
    }

    /// Status of `index`.
    pub fn status(&self, index: usize) -> Option<SlotStatus> {
        self.slots.get(index).map(|s| s.status)
    }

    /// Number of busy slots.
    pub fn busy_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.status != SlotStatus::Idle)
            .count()
    }

    /// True if no slot is busy.
    pub fn is_idle(&self) -> bool {
        self.busy_count() == 0
    }
}
