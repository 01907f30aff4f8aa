//! # Dispatcher tick.
//!
//! One tick is a cheap, non-blocking scan: for each free slot (lowest index first)
//! pop the queue head and hand the pair to the supervisor. It stops early when the
//! queue runs dry and never waits for an execution to finish.
//!
//! Assignment order is (lowest free slot) × (queue head); there is no other ordering
//! between the two.

use crate::core::control::Control;

impl<P, R> Control<P, R>
where
    P: Send + Sync + 'static,
    R: Send + 'static,
{
    /// Runs one scheduling tick. Returns how many tasks were dispatched.
    pub(super) fn tick(&mut self) -> usize {
        if self.queue.is_empty() {
            return 0;
        }

        let mut dispatched = 0;
        for slot in self.registry.free_slot_indices() {
            let Some(task) = self.queue.pop_front() else {
                break;
            };
            self.supervise(slot, task);
            dispatched += 1;
        }
        dispatched
    }
}
