use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::callbacks::{EventHub, Handler, TaskSuccess};
use crate::core::config::SchedulerConfig;
use crate::core::control::Control;
use crate::core::lifecycle::Lifecycle;
use crate::core::scheduler::Scheduler;
use crate::error::{SchedulerError, TaskFailure};
use crate::events::{Bus, Event};
use crate::pool::{TaskQueue, WorkerRegistry};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::WorkerRef;

/// Builder for constructing a [`Scheduler`] with optional features.
pub struct SchedulerBuilder<P, R> {
    workers: Vec<WorkerRef<P, R>>,
    cfg: SchedulerConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    handlers: Vec<Handler<P, R>>,
}

impl<P, R> SchedulerBuilder<P, R>
where
    P: Send + Sync + 'static,
    R: Send + 'static,
{
    /// Creates a new builder over the given ordered worker set.
    pub fn new(workers: Vec<WorkerRef<P, R>>) -> Self {
        Self {
            workers,
            cfg: SchedulerConfig::default(),
            subscribers: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: SchedulerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive scheduler events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the success callback.
    pub fn on_success(mut self, f: impl FnMut(TaskSuccess<P, R>) + Send + 'static) -> Self {
        self.handlers.push(Handler::success(f));
        self
    }

    /// Sets the error callback.
    pub fn on_error(mut self, f: impl FnMut(TaskFailure<P, R>) + Send + 'static) -> Self {
        self.handlers.push(Handler::error(f));
        self
    }

    /// Sets the drained (`END`) callback.
    pub fn on_drained(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.handlers.push(Handler::end(f));
        self
    }

    /// Builds the scheduler and spawns its control loop.
    ///
    /// Fails with [`SchedulerError::Configuration`] if the worker set is empty.
    /// Must be called inside a Tokio runtime.
    pub fn build(self) -> Result<Scheduler<P, R>, SchedulerError> {
        let registry = WorkerRegistry::new(self.workers)?;
        let slots = registry.len();

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let mut hub = EventHub::new();
        for handler in self.handlers {
            hub.install(handler);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let closed = CancellationToken::new();
        let exited = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            subscriber_listener(bus.subscribe(), set, exited.clone());
        }

        let control = Control {
            queue: TaskQueue::new(),
            registry,
            hub,
            lifecycle: Lifecycle::new(self.cfg.poll_interval_clamped()),
            bus: bus.clone(),
            tx: tx.clone(),
        };
        let exit_guard = exited.drop_guard();
        let loop_closed = closed.clone();
        tokio::spawn(async move {
            let _exit = exit_guard;
            control.run(rx, loop_closed).await;
        });

        tracing::debug!(slots, "scheduler built");
        Ok(Scheduler::from_parts(tx, bus, slots, closed))
    }
}

/// Forwards bus events to the subscriber set until the control loop exits.
///
/// Events already in the channel are delivered before exiting.
fn subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    exited: CancellationToken,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "subscriber listener lagged");
                    }
                },
                _ = exited.cancelled() => break,
            }
        }
        set.shutdown().await;
    });
}
