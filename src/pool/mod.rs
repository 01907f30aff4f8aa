//! Scheduler bookkeeping: the pending [`TaskQueue`] and the [`WorkerRegistry`] of slots.
//!
//! Both are owned by the control loop and never shared.

mod queue;
mod registry;

pub(crate) use queue::TaskQueue;
pub(crate) use registry::{SlotStatus, WorkerRegistry};
