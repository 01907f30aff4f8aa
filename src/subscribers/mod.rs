//! # Event subscribers.
//!
//! Observers of scheduler [`Event`](crate::Event)s, fed through a [`SubscriberSet`].
//!
//! ```text
//! control loop ── publish(Event) ──► Bus ──► subscriber listener ──► SubscriberSet
//!                                                                  ┌─────┴─────┐
//!                                                                  ▼           ▼
//!                                                             LogWriter     Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use set::panic_message;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
