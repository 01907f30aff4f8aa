//! Runtime core: control loop, dispatch and lifecycle.
//!
//! The only public entry points are [`Scheduler`] and [`SchedulerBuilder`].
//!
//! Internal modules:
//! - [`control`]: single-owner command loop holding queue, registry and callbacks;
//! - [`dispatcher`]: one non-blocking tick binding free slots to queued tasks;
//! - [`supervisor`]: runs one bound pair and settles it exactly once;
//! - [`lifecycle`]: `Stopped`/`Running` state and the periodic ticker.

mod builder;
mod config;
mod control;
mod dispatcher;
mod lifecycle;
mod scheduler;
mod supervisor;

pub use builder::SchedulerBuilder;
pub use config::SchedulerConfig;
pub use control::Status;
pub use lifecycle::SchedulerState;
pub use scheduler::{Scheduler, Submission, pool_of};
