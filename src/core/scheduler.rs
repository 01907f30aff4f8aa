//! # Scheduler: public handle to a bounded-worker FIFO scheduler.
//!
//! A [`Scheduler`] owns a fixed pool of worker slots and a FIFO queue. Submitted tasks
//! are dispatched to the lowest free slot in submission order; at most one task runs
//! per slot. When the queue and all slots are empty the scheduler stops polling and
//! fires the drained (`END`) callback once.
//!
//! ## Architecture
//! ```text
//! submit() ──► Command::Submit ──► TaskQueue ──► tick ──► WorkerRegistry.reserve
//!                                     ▲                        │
//!                                     │                        ▼
//!                          ticker (poll_interval)      tokio::spawn(worker.execute)
//!                                                              │
//!        EventHub ◄── settle: callback → release → check_drained ◄┘
//! ```
//!
//! ## Example
//! ```rust
//! use slotpool::{Scheduler, SchedulerConfig, TaskError, TaskRecord};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (done_tx, done_rx) = tokio::sync::oneshot::channel();
//!     let mut done_tx = Some(done_tx);
//!
//!     let sched = Scheduler::<u64, u64>::builder(slotpool::pool_of(2))
//!         .with_config(SchedulerConfig::default())
//!         .on_success(|ok| println!("{} -> {}", ok.task.display_name(), ok.result))
//!         .on_drained(move || {
//!             if let Some(tx) = done_tx.take() {
//!                 let _ = tx.send(());
//!             }
//!         })
//!         .build()?;
//!
//!     let tasks: Vec<_> = (1..=5)
//!         .map(|n| TaskRecord::new(n, |n: u64| async move { Ok::<_, TaskError>(n * n) }))
//!         .collect();
//!     sched.submit(tasks)?;
//!
//!     done_rx.await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::callbacks::Handler;
use crate::core::builder::SchedulerBuilder;
use crate::core::config::SchedulerConfig;
use crate::core::control::{Command, Status};
use crate::error::SchedulerError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{Invoke, TaskRecord, WorkerRef};

/// One record or an ordered batch of records.
pub enum Submission<P, R> {
    One(TaskRecord<P, R>),
    Many(Vec<TaskRecord<P, R>>),
}

impl<P, R> From<TaskRecord<P, R>> for Submission<P, R> {
    fn from(task: TaskRecord<P, R>) -> Self {
        Submission::One(task)
    }
}

impl<P, R> From<Vec<TaskRecord<P, R>>> for Submission<P, R> {
    fn from(tasks: Vec<TaskRecord<P, R>>) -> Self {
        Submission::Many(tasks)
    }
}

impl<P, R> Submission<P, R> {
    fn into_vec(self) -> Vec<TaskRecord<P, R>> {
        match self {
            Submission::One(task) => vec![task],
            Submission::Many(tasks) => tasks,
        }
    }
}

/// Builds `n` [`Invoke`] workers.
pub fn pool_of<P, R>(n: usize) -> Vec<WorkerRef<P, R>>
where
    P: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    (0..n).map(|_| Invoke::arc()).collect()
}

/// State shared by all clones of a handle. Dropping the last one tells the control
/// loop to finish up.
struct Inner<P, R> {
    tx: mpsc::UnboundedSender<Command<P, R>>,
    bus: Bus,
    slots: usize,
    next_id: AtomicU64,
    _closed: DropGuard,
}

/// Handle to a running scheduler. Cheap to clone.
pub struct Scheduler<P, R> {
    inner: Arc<Inner<P, R>>,
}

impl<P, R> Clone for Scheduler<P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, R> Scheduler<P, R>
where
    P: Send + Sync + 'static,
    R: Send + 'static,
{
    /// Returns a builder over the given ordered worker set.
    pub fn builder(workers: Vec<WorkerRef<P, R>>) -> SchedulerBuilder<P, R> {
        SchedulerBuilder::new(workers)
    }

    /// Builds a scheduler with default callbacks.
    ///
    /// Fails with [`SchedulerError::Configuration`] if `workers` is empty.
    pub fn new(workers: Vec<WorkerRef<P, R>>, cfg: SchedulerConfig) -> Result<Self, SchedulerError> {
        Self::builder(workers).with_config(cfg).build()
    }

    /// Builds a scheduler of `n` slots that run each task's own executor.
    pub fn with_pool_size(n: usize, cfg: SchedulerConfig) -> Result<Self, SchedulerError>
    where
        P: Clone,
    {
        Self::new(pool_of(n), cfg)
    }

    pub(crate) fn from_parts(
        tx: mpsc::UnboundedSender<Command<P, R>>,
        bus: Bus,
        slots: usize,
        closed: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                tx,
                bus,
                slots,
                next_id: AtomicU64::new(1),
                _closed: closed.drop_guard(),
            }),
        }
    }

    /// Submits one task or an ordered batch; starts the scheduler if stopped.
    ///
    /// Records without an executor are dropped (not enqueued, no callback); each drop is
    /// logged and published as [`EventKind::TaskRejected`]. Returns how many records were
    /// accepted.
    pub fn submit(&self, tasks: impl Into<Submission<P, R>>) -> Result<usize, SchedulerError> {
        let mut accepted = Vec::new();
        for mut task in tasks.into().into_vec() {
            if !task.has_executor() {
                tracing::warn!(task = task.label().unwrap_or("-"), "dropping task without executor");
                let mut ev = Event::new(EventKind::TaskRejected).with_reason("missing_executor");
                if let Some(label) = task.label() {
                    ev = ev.with_name(label);
                }
                self.inner.bus.publish(ev);
                continue;
            }
            task.assign_id(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
            accepted.push(task);
        }

        let n = accepted.len();
        if n > 0 {
            self.send(Command::Submit(accepted))?;
        }
        Ok(n)
    }

    /// Registers a callback under `SUCCESS`, `ERROR` or `END` (case-insensitive).
    ///
    /// Unknown names, and handlers that do not match the name, are ignored.
    pub fn register_callback(&self, name: &str, handler: Handler<P, R>) -> Result<(), SchedulerError> {
        self.send(Command::Register {
            name: name.to_string(),
            handler,
        })
    }

    /// Starts polling if there is pending or in-flight work. Idempotent.
    pub fn start(&self) -> Result<(), SchedulerError> {
        self.send(Command::Start)
    }

    /// Stops polling without firing the drained callback. Idempotent.
    ///
    /// In-flight tasks still settle and notify; queued tasks wait for the next start.
    pub fn stop(&self) -> Result<(), SchedulerError> {
        self.send(Command::Stop)
    }

    /// Returns a snapshot of the scheduler state.
    pub async fn status(&self) -> Result<Status, SchedulerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Status(reply))?;
        rx.await.map_err(|_| SchedulerError::Closed)
    }

    /// Creates a receiver of subsequent scheduler events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// Pool size.
    pub fn slots(&self) -> usize {
        self.inner.slots
    }

    fn send(&self, cmd: Command<P, R>) -> Result<(), SchedulerError> {
        self.inner.tx.send(cmd).map_err(|_| SchedulerError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::TaskSuccess;
    use crate::core::lifecycle::SchedulerState;
    use crate::error::{TaskError, TaskFailure};
    use crate::tasks::Worker;
    use async_trait::async_trait;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::time::{self, Instant};

    const WAIT: Duration = Duration::from_secs(5);

    fn sleeper(label: &'static str, ms: u64) -> TaskRecord<u64, u64> {
        TaskRecord::new(ms, |ms: u64| async move {
            time::sleep(Duration::from_millis(ms)).await;
            Ok(ms)
        })
        .with_label(label)
    }

    fn failing(label: &'static str, error: &'static str) -> TaskRecord<u64, u64> {
        TaskRecord::new(0, move |_: u64| async move { Err(TaskError::fail(error)) }).with_label(label)
    }

    /// Scheduler that reports every drain on the returned channel.
    fn with_drain_signal(
        workers: Vec<WorkerRef<u64, u64>>,
    ) -> (Scheduler<u64, u64>, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sched = Scheduler::builder(workers)
            .on_drained(move || {
                let _ = tx.send(());
            })
            .build()
            .unwrap();
        (sched, rx)
    }

    async fn wait_drained(rx: &mut mpsc::UnboundedReceiver<()>) {
        time::timeout(WAIT, rx.recv())
            .await
            .expect("drain timed out")
            .expect("drain channel closed");
    }

    /// Collects events until (and including) the first `Drained`.
    async fn events_until_drained(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        loop {
            let ev = time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
            let done = ev.kind == EventKind::Drained;
            out.push(ev);
            if done {
                return out;
            }
        }
    }

    fn dispatches(events: &[Event]) -> Vec<(String, usize)> {
        events
            .iter()
            .filter(|e| e.kind == EventKind::TaskDispatched)
            .map(|e| (e.task.as_deref().unwrap().to_string(), e.slot.unwrap()))
            .collect()
    }

    #[test]
    fn test_empty_worker_set_fails_construction() {
        let err = Scheduler::<u64, u64>::new(Vec::new(), SchedulerConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, SchedulerError::Configuration { .. }));

        let err = Scheduler::<u64, u64>::with_pool_size(0, SchedulerConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.as_label(), "scheduler_configuration");
    }

    #[tokio::test]
    async fn test_dispatch_follows_submission_order() {
        let (sched, mut drained) = with_drain_signal(pool_of(2));
        let mut events = sched.subscribe();

        let labels = ["t0", "t1", "t2", "t3", "t4", "t5", "t6"];
        sched.submit(sleeper(labels[0], 3)).unwrap();
        let batch: Vec<_> = labels[1..].iter().map(|l| sleeper(*l, 3)).collect();
        assert_eq!(sched.submit(batch).unwrap(), 6);

        wait_drained(&mut drained).await;
        let order: Vec<String> = dispatches(&events_until_drained(&mut events).await)
            .into_iter()
            .map(|(task, _)| task)
            .collect();
        assert_eq!(order, labels);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_never_exceeds_pool_size() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (sched, mut drained) = with_drain_signal(pool_of(3));

        let tasks: Vec<_> = (0..24u64)
            .map(|i| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                TaskRecord::new(i, move |i: u64| {
                    let in_flight = in_flight.clone();
                    let peak = peak.clone();
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        time::sleep(Duration::from_millis(1 + i % 4)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok(i)
                    }
                })
            })
            .collect();
        sched.submit(tasks).unwrap();

        wait_drained(&mut drained).await;
        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency {peak} exceeds pool size");
        assert!(peak >= 2, "pool was never used concurrently");
    }

    #[tokio::test]
    async fn test_each_task_notified_exactly_once() {
        let outcomes: Arc<Mutex<Vec<(u64, bool)>>> = Arc::new(Mutex::new(Vec::new()));
        let (drain_tx, mut drained) = mpsc::unbounded_channel();

        let ok_log = outcomes.clone();
        let err_log = outcomes.clone();
        let sched = Scheduler::<u64, u64>::builder(pool_of(2))
            .on_success(move |ok: TaskSuccess<u64, u64>| ok_log.lock().unwrap().push((ok.task.id(), true)))
            .on_error(move |f: TaskFailure<u64, u64>| err_log.lock().unwrap().push((f.task.id(), false)))
            .on_drained(move || {
                let _ = drain_tx.send(());
            })
            .build()
            .unwrap();

        let tasks: Vec<_> = (0..10)
            .map(|i| if i % 3 == 0 { failing("bad", "nope") } else { sleeper("good", i) })
            .collect();
        sched.submit(tasks).unwrap();
        wait_drained(&mut drained).await;

        let mut seen = outcomes.lock().unwrap().clone();
        seen.sort();
        let ids: Vec<u64> = seen.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(seen.iter().filter(|(_, ok)| !ok).count(), 4);
    }

    #[tokio::test]
    async fn test_drain_fires_once_per_cycle() {
        let ends = Arc::new(AtomicUsize::new(0));
        let (tx, mut drained) = mpsc::unbounded_channel();
        let counter = ends.clone();
        let sched = Scheduler::<u64, u64>::builder(pool_of(2))
            .on_drained(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(());
            })
            .build()
            .unwrap();

        sched.submit(vec![sleeper("a", 5), sleeper("b", 1), sleeper("c", 2)]).unwrap();
        wait_drained(&mut drained).await;
        assert_eq!(ends.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ends.load(Ordering::SeqCst), 1, "no re-fire without new work");

        sched.submit(vec![sleeper("d", 1), sleeper("e", 1)]).unwrap();
        wait_drained(&mut drained).await;
        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ends.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_freed_slot_takes_next_task() {
        let (sched, mut drained) = with_drain_signal(pool_of(2));
        let mut events = sched.subscribe();
        let t0 = Instant::now();
        let c_started = Arc::new(Mutex::new(None));

        let mark = c_started.clone();
        let c = TaskRecord::new(10, move |ms: u64| {
            let mark = mark.clone();
            async move {
                *mark.lock().unwrap() = Some(t0.elapsed());
                time::sleep(Duration::from_millis(ms)).await;
                Ok(ms)
            }
        })
        .with_label("C");

        sched
            .submit(vec![sleeper("A", 100), sleeper("B", 10), c])
            .unwrap();
        wait_drained(&mut drained).await;

        let order = dispatches(&events_until_drained(&mut events).await);
        assert_eq!(
            order,
            [("A".to_string(), 0), ("B".to_string(), 1), ("C".to_string(), 1)]
        );

        let c_at = c_started.lock().unwrap().expect("C never ran");
        assert!(c_at >= Duration::from_millis(10), "C started before B finished: {c_at:?}");
        assert!(c_at < Duration::from_millis(100), "C waited for A: {c_at:?}");
    }

    #[tokio::test]
    async fn test_failed_task_releases_slot() {
        let failures: Arc<Mutex<Vec<(String, TaskError)>>> = Arc::new(Mutex::new(Vec::new()));
        let (tx, mut drained) = mpsc::unbounded_channel();
        let log = failures.clone();
        let sched = Scheduler::<u64, u64>::builder(pool_of(1))
            .on_drained(move || {
                let _ = tx.send(());
            })
            .build()
            .unwrap();
        sched
            .register_callback(
                "error",
                Handler::error(move |f: TaskFailure<u64, u64>| {
                    log.lock()
                        .unwrap()
                        .push((f.task.display_name().into_owned(), f.cause));
                }),
            )
            .unwrap();
        let mut events = sched.subscribe();

        sched.submit(vec![failing("bad", "boom"), sleeper("good", 1)]).unwrap();
        wait_drained(&mut drained).await;

        assert_eq!(
            *failures.lock().unwrap(),
            [("bad".to_string(), TaskError::fail("boom"))]
        );
        let events = events_until_drained(&mut events).await;
        assert_eq!(
            dispatches(&events),
            [("bad".to_string(), 0), ("good".to_string(), 0)]
        );
        assert!(events.iter().any(|e| e.kind == EventKind::TaskSucceeded));
    }

    #[tokio::test]
    async fn test_panicking_executor_is_contained() {
        let causes = Arc::new(Mutex::new(Vec::new()));
        let (tx, mut drained) = mpsc::unbounded_channel();
        let log = causes.clone();
        let sched = Scheduler::<u64, u64>::builder(pool_of(1))
            .on_error(move |f: TaskFailure<u64, u64>| log.lock().unwrap().push(f.cause))
            .on_drained(move || {
                let _ = tx.send(());
            })
            .build()
            .unwrap();

        let boom = TaskRecord::new(0, |_: u64| async move {
            if true {
                panic!("executor exploded");
            }
            Ok(0)
        });
        sched.submit(vec![boom, sleeper("after", 1)]).unwrap();
        wait_drained(&mut drained).await;

        assert_eq!(
            *causes.lock().unwrap(),
            [TaskError::Panicked {
                info: "executor exploded".to_string()
            }]
        );
    }

    struct Unplugged;

    #[async_trait]
    impl Worker<u64, u64> for Unplugged {
        async fn execute(&self, _task: &TaskRecord<u64, u64>) -> Result<u64, TaskError> {
            unreachable!("never ready")
        }

        fn ensure_ready(&self) -> Result<(), TaskError> {
            Err(TaskError::Configuration {
                reason: "worker unplugged".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_unusable_slot_fails_task_not_scheduler() {
        let causes = Arc::new(Mutex::new(Vec::new()));
        let successes = Arc::new(AtomicUsize::new(0));
        let (tx, mut drained) = mpsc::unbounded_channel();
        let log = causes.clone();
        let ok = successes.clone();

        let workers: Vec<WorkerRef<u64, u64>> = vec![Arc::new(Unplugged), Invoke::arc()];
        let sched = Scheduler::builder(workers)
            .on_success(move |_| {
                ok.fetch_add(1, Ordering::SeqCst);
            })
            .on_error(move |f: TaskFailure<u64, u64>| log.lock().unwrap().push(f.cause.as_label()))
            .on_drained(move || {
                let _ = tx.send(());
            })
            .build()
            .unwrap();

        sched.submit(vec![sleeper("x", 1), sleeper("y", 1)]).unwrap();
        wait_drained(&mut drained).await;

        assert_eq!(*causes.lock().unwrap(), ["task_configuration"]);
        assert_eq!(successes.load(Ordering::SeqCst), 1);
        let status = sched.status().await.unwrap();
        assert!(status.busy.is_empty());
    }

    /// Panics while building the execution future, before any poll.
    struct Eager;

    impl Worker<u64, u64> for Eager {
        fn execute<'life0, 'life1, 'async_trait>(
            &'life0 self,
            _task: &'life1 TaskRecord<u64, u64>,
        ) -> Pin<Box<dyn Future<Output = Result<u64, TaskError>> + Send + 'async_trait>>
        where
            'life0: 'async_trait,
            'life1: 'async_trait,
            Self: 'async_trait,
        {
            panic!("worker refused synchronously");
        }
    }

    struct Fragile;

    #[async_trait]
    impl Worker<u64, u64> for Fragile {
        async fn execute(&self, _task: &TaskRecord<u64, u64>) -> Result<u64, TaskError> {
            unreachable!("readiness check panics first")
        }

        fn ensure_ready(&self) -> Result<(), TaskError> {
            panic!("readiness check crashed");
        }
    }

    #[tokio::test]
    async fn test_synchronous_worker_panic_releases_slot() {
        let causes = Arc::new(Mutex::new(Vec::new()));
        let (tx, mut drained) = mpsc::unbounded_channel();
        let log = causes.clone();
        let workers: Vec<WorkerRef<u64, u64>> = vec![Arc::new(Eager)];
        let sched = Scheduler::builder(workers)
            .on_error(move |f: TaskFailure<u64, u64>| log.lock().unwrap().push(f.cause))
            .on_drained(move || {
                let _ = tx.send(());
            })
            .build()
            .unwrap();

        sched.submit(vec![sleeper("a", 1), sleeper("b", 1)]).unwrap();
        wait_drained(&mut drained).await;

        let panicked = TaskError::Panicked {
            info: "worker refused synchronously".to_string(),
        };
        assert_eq!(*causes.lock().unwrap(), [panicked.clone(), panicked]);
        let status = sched.status().await.unwrap();
        assert!(status.busy.is_empty());
        assert_eq!(status.state, SchedulerState::Stopped);
    }

    #[tokio::test]
    async fn test_readiness_panic_fails_task_not_scheduler() {
        let causes = Arc::new(Mutex::new(Vec::new()));
        let (tx, mut drained) = mpsc::unbounded_channel();
        let log = causes.clone();
        let workers: Vec<WorkerRef<u64, u64>> = vec![Arc::new(Fragile), Invoke::arc()];
        let sched = Scheduler::builder(workers)
            .on_error(move |f: TaskFailure<u64, u64>| log.lock().unwrap().push(f.cause))
            .on_drained(move || {
                let _ = tx.send(());
            })
            .build()
            .unwrap();

        sched.submit(vec![sleeper("x", 1), sleeper("y", 1)]).unwrap();
        wait_drained(&mut drained).await;

        assert_eq!(
            *causes.lock().unwrap(),
            [TaskError::Configuration {
                reason: "panic: readiness check crashed".to_string()
            }]
        );
        assert_eq!(sched.submit(sleeper("z", 1)).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_restart_with_only_in_flight_work_drains() {
        let (sched, mut drained) = with_drain_signal(pool_of(2));

        sched.submit(vec![sleeper("a", 20), sleeper("b", 20)]).unwrap();
        sched.stop().unwrap();
        let status = sched.status().await.unwrap();
        assert_eq!(status.queued, 0);
        assert_eq!(status.busy, [0, 1]);

        sched.start().unwrap();
        assert_eq!(sched.status().await.unwrap().state, SchedulerState::Running);
        wait_drained(&mut drained).await;
        assert_eq!(sched.status().await.unwrap().state, SchedulerState::Stopped);
    }

    #[tokio::test]
    async fn test_zero_tasks_stays_stopped() {
        let fired = Arc::new(AtomicUsize::new(0));
        let (a, b, c) = (fired.clone(), fired.clone(), fired.clone());
        let sched = Scheduler::<u64, u64>::builder(pool_of(2))
            .on_success(move |_: TaskSuccess<u64, u64>| {
                a.fetch_add(1, Ordering::SeqCst);
            })
            .on_error(move |_| {
                b.fetch_add(1, Ordering::SeqCst);
            })
            .on_drained(move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        assert_eq!(sched.submit(Vec::<TaskRecord<u64, u64>>::new()).unwrap(), 0);
        sched.start().unwrap();
        time::sleep(Duration::from_millis(30)).await;

        let status = sched.status().await.unwrap();
        assert_eq!(status.state, SchedulerState::Stopped);
        assert_eq!(status.queued, 0);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_submission_is_dropped() {
        let errors = Arc::new(AtomicUsize::new(0));
        let (tx, mut drained) = mpsc::unbounded_channel();
        let e = errors.clone();
        let sched = Scheduler::<u64, u64>::builder(pool_of(1))
            .on_error(move |_: TaskFailure<u64, u64>| {
                e.fetch_add(1, Ordering::SeqCst);
            })
            .on_drained(move || {
                let _ = tx.send(());
            })
            .build()
            .unwrap();
        let mut events = sched.subscribe();

        let malformed = TaskRecord::from_parts(7, None).with_label("broken");
        let accepted = sched.submit(vec![malformed, sleeper("fine", 1)]).unwrap();
        assert_eq!(accepted, 1);
        assert_eq!(sched.submit(TaskRecord::<u64, u64>::from_parts(8, None)).unwrap(), 0);

        wait_drained(&mut drained).await;
        assert_eq!(errors.load(Ordering::SeqCst), 0);

        let events = events_until_drained(&mut events).await;
        let rejected: Vec<_> = events
            .iter()
            .filter(|e| e.kind == EventKind::TaskRejected)
            .collect();
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].task.as_deref(), Some("broken"));
        assert_eq!(dispatches(&events), [("fine".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_start_and_stop_are_idempotent() {
        let (sched, mut drained) = with_drain_signal(pool_of(1));
        let mut events = sched.subscribe();

        sched.stop().unwrap();
        sched.stop().unwrap();
        sched.submit(sleeper("a", 5)).unwrap();
        sched.start().unwrap();
        sched.start().unwrap();
        wait_drained(&mut drained).await;

        let events = events_until_drained(&mut events).await;
        let count = |kind| events.iter().filter(|e| e.kind == kind).count();
        assert_eq!(count(EventKind::SchedulerStarted), 1);
        assert_eq!(count(EventKind::SchedulerStopped), 1);
        assert_eq!(count(EventKind::Drained), 1);
    }

    #[tokio::test]
    async fn test_stop_pauses_dispatch_without_drain() {
        let (sched, mut drained) = with_drain_signal(pool_of(1));
        let successes = Arc::new(AtomicUsize::new(0));
        let ok = successes.clone();
        sched
            .register_callback(
                "SUCCESS",
                Handler::success(move |_| {
                    ok.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        sched.submit(vec![sleeper("first", 10), sleeper("second", 1)]).unwrap();
        sched.stop().unwrap();

        time::sleep(Duration::from_millis(60)).await;
        let status = sched.status().await.unwrap();
        assert_eq!(status.state, SchedulerState::Stopped);
        assert_eq!(status.queued, 1);
        assert!(status.busy.is_empty());
        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert!(drained.try_recv().is_err(), "stop must not fire END");

        sched.start().unwrap();
        wait_drained(&mut drained).await;
        assert_eq!(successes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropping_handle_finishes_queued_work() {
        let (sched, mut drained) = with_drain_signal(pool_of(1));
        sched
            .submit(vec![sleeper("a", 5), sleeper("b", 5), sleeper("c", 5)])
            .unwrap();
        drop(sched);
        wait_drained(&mut drained).await;
    }

    #[tokio::test]
    async fn test_unknown_callback_name_is_ignored() {
        let (sched, mut drained) = with_drain_signal(pool_of(1));
        sched
            .register_callback("finished", Handler::end(|| panic!("must not be installed")))
            .unwrap();
        sched.submit(sleeper("a", 1)).unwrap();
        wait_drained(&mut drained).await;
        assert_eq!(sched.slots(), 1);
    }
}
