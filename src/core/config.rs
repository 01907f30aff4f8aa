//! # Scheduler configuration.
//!
//! Provides [`SchedulerConfig`] centralized settings for the scheduler runtime.
//!
//! ## Clamped values
//! - `poll_interval < 1ms` → `1ms` (a zero period is not a valid timer)
//! - `bus_capacity = 0` → `1`

use std::time::Duration;

/// Smallest accepted polling period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Global configuration for the scheduler.
///
/// ## Field semantics
/// - `poll_interval`: period of the dispatcher tick while running
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Period of the readiness scan while the scheduler is running.
    ///
    /// Slot releases and submissions also trigger an immediate scan, so this only
    /// bounds the latency of work that nothing else wakes up.
    pub poll_interval: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl SchedulerConfig {
    /// Returns the poll interval clamped to a minimum of 1ms.
    #[inline]
    pub fn poll_interval_clamped(&self) -> Duration {
        self.poll_interval.max(MIN_POLL_INTERVAL)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `poll_interval = 10ms`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            bus_capacity: 1024,
        }
    }
}
