//! Completion notifications: success, error and drained (`END`) callbacks.

mod handler;
mod hub;

pub use handler::{EventName, Handler, TaskSuccess, UnknownEventName};
pub(crate) use hub::EventHub;
