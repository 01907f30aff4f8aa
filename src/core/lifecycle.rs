//! # Lifecycle: `Stopped` / `Running` and the polling timer.
//!
//! ```text
//!   Stopped ──(first submit | start with pending work)──► Running   spawn ticker
//!   Running ──(no progress, queue empty, no busy slot)──► Stopped   cancel ticker, fire END once
//!   Running ──(stop)────────────────────────────────────► Stopped   cancel ticker, no END
//! ```
//!
//! ## Rules
//! - The ticker is owned here exclusively. It is cancelled through a `DropGuard`, so
//!   every exit path (drain, stop, scheduler teardown) cancels it.
//! - `start` while running and `stop` while stopped are no-ops.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not polling. Initial state.
    Stopped,
    /// Polling the dispatcher.
    Running,
}

/// Handle to the running ticker; dropping it cancels the ticker.
struct PollHandle {
    _guard: DropGuard,
}

pub(crate) struct Lifecycle {
    interval: Duration,
    poll: Option<PollHandle>,
}

impl Lifecycle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            poll: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.poll.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.poll.is_some()
    }

    /// `Stopped → Running`: spawns a ticker calling `tick` every interval until cancelled
    /// or until `tick` returns `false`. Returns `false` if already running.
    pub fn start(&mut self, tick: impl Fn() -> bool + Send + 'static) -> bool {
        if self.poll.is_some() {
            return false;
        }
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let period = self.interval;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        if !tick() {
                            break;
                        }
                    }
                }
            }
        });

        self.poll = Some(PollHandle {
            _guard: token.drop_guard(),
        });
        true
    }

    /// `Running → Stopped`: cancels the ticker. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        self.poll.take().is_some()
    }
}
