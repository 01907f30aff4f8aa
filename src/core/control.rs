//! # Control loop: the single owner of scheduler state.
//!
//! All bookkeeping (queue, slot busy set, callbacks, lifecycle) lives in [`Control`],
//! which runs as one Tokio task and is driven by [`Command`]s. Nothing else touches
//! that state, so no lock is needed.
//!
//! ```text
//! Scheduler handle ──┐
//! ticker ────────────┼──► mpsc<Command> ──► Control::handle()
//! executions ────────┘                        ├─ Submit   → enqueue, ensure started, tick
//!                                             ├─ Start    → ensure started, tick
//!                                             ├─ Stop     → cancel ticker (no END)
//!                                             ├─ Tick     → check_drained (tick first)
//!                                             ├─ Settled  → callback, release, check_drained
//!                                             ├─ Register → EventHub::register
//!                                             └─ Status   → snapshot
//! ```
//!
//! ## Exit
//! Once every scheduler handle is dropped, the loop keeps running until in-flight work
//! settles (and, if running, until the queue drains), then exits. Dropping `Control`
//! cancels the ticker.

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::callbacks::{EventHub, Handler};
use crate::core::lifecycle::{Lifecycle, SchedulerState};
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::pool::{SlotStatus, TaskQueue, WorkerRegistry};
use crate::tasks::TaskRecord;

/// Messages processed by the control loop.
pub(crate) enum Command<P, R> {
    Submit(Vec<TaskRecord<P, R>>),
    Start,
    Stop,
    Register {
        name: String,
        handler: Handler<P, R>,
    },
    Tick,
    Settled(Settlement<P, R>),
    Status(oneshot::Sender<Status>),
}

/// Result of one execution, reported back to the control loop.
pub(crate) struct Settlement<P, R> {
    pub slot: usize,
    pub task: TaskRecord<P, R>,
    pub outcome: Result<R, TaskError>,
}

/// Point-in-time view of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Lifecycle state.
    pub state: SchedulerState,
    /// Tasks waiting in the queue.
    pub queued: usize,
    /// Indices of busy slots, ascending.
    pub busy: Vec<usize>,
    /// Pool size.
    pub slots: usize,
}

pub(crate) struct Control<P, R> {
    pub(super) queue: TaskQueue<P, R>,
    pub(super) registry: WorkerRegistry<P, R>,
    pub(super) hub: EventHub<P, R>,
    pub(super) lifecycle: Lifecycle,
    pub(super) bus: Bus,
    pub(super) tx: mpsc::UnboundedSender<Command<P, R>>,
}

impl<P, R> Control<P, R>
where
    P: Send + Sync + 'static,
    R: Send + 'static,
{
    /// Runs until all handles are gone (`closed` cancelled) and there is nothing left to settle.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command<P, R>>, closed: CancellationToken) {
        let mut closing = false;
        loop {
            tokio::select! {
                biased;
                cmd = rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
                _ = closed.cancelled(), if !closing => {
                    tracing::debug!("all scheduler handles dropped; finishing in-flight work");
                    closing = true;
                }
            }

            if closing && self.finished() {
                break;
            }
        }

        if !self.queue.is_empty() {
            tracing::debug!(abandoned = self.queue.len(), "scheduler exited with queued tasks");
        }
    }

    /// Nothing in flight, and nothing that would still be dispatched.
    fn finished(&self) -> bool {
        self.registry.is_idle() && (!self.lifecycle.is_running() || self.queue.is_empty())
    }

    fn handle(&mut self, cmd: Command<P, R>) {
        match cmd {
            Command::Submit(tasks) => self.on_submit(tasks),
            Command::Start => self.on_start(),
            Command::Stop => self.on_stop(),
            Command::Register { name, handler } => {
                self.hub.register(&name, handler);
            }
            Command::Tick => self.check_drained(),
            Command::Settled(s) => self.settle(s),
            Command::Status(reply) => {
                let _ = reply.send(self.status());
            }
        }
    }

    fn on_submit(&mut self, tasks: Vec<TaskRecord<P, R>>) {
        if tasks.is_empty() {
            return;
        }
        for task in &tasks {
            self.bus.publish(
                Event::new(EventKind::TaskQueued).with_task(task.id(), &*task.display_name()),
            );
        }
        self.queue.enqueue_batch(tasks);
        self.ensure_started();
        self.check_drained();
    }

    fn on_start(&mut self) {
        if self.lifecycle.is_running() {
            return;
        }
        if self.queue.is_empty() && self.registry.is_idle() {
            tracing::debug!("start ignored: nothing to run");
            return;
        }
        self.ensure_started();
        self.check_drained();
    }

    fn on_stop(&mut self) {
        if self.lifecycle.stop() {
            tracing::debug!(queued = self.queue.len(), busy = self.registry.busy_count(), "scheduler stopped");
            self.bus
                .publish(Event::new(EventKind::SchedulerStopped).with_reason("stop_requested"));
        }
    }

    /// `Stopped → Running`; no-op if already running.
    fn ensure_started(&mut self) {
        let tx = self.tx.clone();
        if self.lifecycle.start(move || tx.send(Command::Tick).is_ok()) {
            tracing::debug!(queued = self.queue.len(), "scheduler started");
            self.bus.publish(Event::new(EventKind::SchedulerStarted));
        }
    }

    /// Ticks the dispatcher; if that made no progress and nothing is queued or busy,
    /// stops and fires the drained callback. Only acts while running, so END fires
    /// once per drain.
    pub(super) fn check_drained(&mut self) {
        if !self.lifecycle.is_running() {
            return;
        }
        let dispatched = self.tick();
        if dispatched > 0 || !self.queue.is_empty() || !self.registry.is_idle() {
            return;
        }

        self.lifecycle.stop();
        tracing::debug!("scheduler drained");
        self.bus
            .publish(Event::new(EventKind::SchedulerStopped).with_reason("drained"));
        self.bus.publish(Event::new(EventKind::Drained));
        self.hub.notify_drained();
    }

    fn status(&self) -> Status {
        let busy = (0..self.registry.len())
            .filter(|&i| matches!(self.registry.status(i), Some(SlotStatus::Busy { .. })))
            .collect();
        Status {
            state: self.lifecycle.state(),
            queued: self.queue.len(),
            busy,
            slots: self.registry.len(),
        }
    }
}
