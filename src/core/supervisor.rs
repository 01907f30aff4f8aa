//! # Execution supervisor: one bound (slot, task) pair from dispatch to settlement.
//!
//! ```text
//! supervise(slot, task)
//!   ├─► reserve slot, publish TaskDispatched
//!   ├─► worker.ensure_ready()  ── Err / panic ──► Settled(Err(Configuration))
//!   └─► tokio::spawn(catch_unwind(async { worker.execute(&task).await }))
//!             └─► Settled { slot, task, outcome }  ──► control loop
//!
//! settle(Settled)
//!   ├─► (a) success / error callback      (exactly one of them)
//!   ├─► (b) release slot
//!   └─► (c) check_drained
//! ```
//!
//! ## Rules
//! - Every dispatched task settles exactly once, whatever the executor does
//!   (returns, fails, panics), so a slot can never stay busy because a task failed.
//! - Settlement is always delivered through the command channel, never inline,
//!   so a tick never re-enters itself.
//! - No timeout and no cancellation: a stalled task keeps its slot.

use std::panic::{AssertUnwindSafe, catch_unwind};

use futures::FutureExt;

use crate::callbacks::TaskSuccess;
use crate::core::control::{Command, Control, Settlement};
use crate::error::{TaskError, TaskFailure};
use crate::events::{Event, EventKind};
use crate::subscribers::panic_message;
use crate::tasks::TaskRecord;

impl<P, R> Control<P, R>
where
    P: Send + Sync + 'static,
    R: Send + 'static,
{
    /// Binds `task` to `slot` and starts it as an independent execution.
    pub(super) fn supervise(&mut self, slot: usize, task: TaskRecord<P, R>) {
        let Some(worker) = self.registry.worker(slot).cloned() else {
            return;
        };
        let reserved = self.registry.reserve(slot, task.id());
        debug_assert!(reserved, "dispatched to busy slot {slot}");

        let name = task.display_name().into_owned();
        tracing::trace!(task = %name, id = task.id(), slot, "dispatching");
        self.bus.publish(
            Event::new(EventKind::TaskDispatched)
                .with_task(task.id(), name)
                .with_slot(slot),
        );

        let tx = self.tx.clone();
        let ready = catch_unwind(AssertUnwindSafe(|| worker.ensure_ready())).unwrap_or_else(|panic_err| {
            Err(TaskError::Panicked {
                info: panic_message(&*panic_err),
            })
        });
        if let Err(err) = ready {
            let cause = match err {
                TaskError::Configuration { .. } => err,
                other => TaskError::Configuration {
                    reason: other.as_message(),
                },
            };
            let _ = tx.send(Command::Settled(Settlement {
                slot,
                task,
                outcome: Err(cause),
            }));
            return;
        }

        tokio::spawn(async move {
            // The future is built inside the guard: a worker may panic before returning it.
            let run = async {
                tracing::trace!(id = task.id(), slot, worker = worker.name(), "executing");
                worker.execute(&task).await
            };
            let outcome = match AssertUnwindSafe(run).catch_unwind().await {
                Ok(res) => res,
                Err(panic_err) => Err(TaskError::Panicked {
                    info: panic_message(&*panic_err),
                }),
            };
            let _ = tx.send(Command::Settled(Settlement {
                slot,
                task,
                outcome,
            }));
        });
    }

    /// Handles a settled execution: callback, then release, then drain check.
    pub(super) fn settle(&mut self, settlement: Settlement<P, R>) {
        let Settlement {
            slot,
            task,
            outcome,
        } = settlement;
        let name = task.display_name().into_owned();

        match outcome {
            Ok(result) => {
                self.bus.publish(
                    Event::new(EventKind::TaskSucceeded)
                        .with_task(task.id(), name)
                        .with_slot(slot),
                );
                self.hub.notify_success(TaskSuccess { task, result });
            }
            Err(cause) => {
                tracing::debug!(task = %name, id = task.id(), slot, error = %cause, label = cause.as_label(), "task settled with error");
                self.bus.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_task(task.id(), name)
                        .with_slot(slot)
                        .with_reason(cause.to_string()),
                );
                self.hub.notify_error(TaskFailure { task, cause });
            }
        }

        if let Some((id, busy_for)) = self.registry.release(slot) {
            tracing::trace!(slot, id, ?busy_for, "slot released");
        }
        self.check_drained();
    }
}
