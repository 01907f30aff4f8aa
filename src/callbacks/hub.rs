//! # EventHub: the three registrable callbacks.
//!
//! Holds one handler per [`EventName`]. Until replaced, each slot holds a default
//! handler that only logs. Handlers run inline on the control loop, in settlement
//! order, so they must not block.
//!
//! ## Rules
//! - Unknown names are ignored (nothing is signaled).
//! - A handler registered under a name of the other kind is ignored (warn).
//! - A panicking handler is contained and logged; the scheduler keeps going.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::callbacks::handler::{EndFn, ErrorFn, EventName, Handler, SuccessFn, TaskSuccess};
use crate::error::TaskFailure;
use crate::subscribers::panic_message;

pub(crate) struct EventHub<P, R> {
    success: SuccessFn<P, R>,
    error: ErrorFn<P, R>,
    end: EndFn,
}

impl<P: 'static, R: 'static> EventHub<P, R> {
    /// Creates a hub with the logging defaults.
    pub fn new() -> Self {
        Self {
            success: Box::new(|ok: TaskSuccess<P, R>| {
                tracing::info!(task = %ok.task.display_name(), id = ok.task.id(), "task succeeded");
            }),
            error: Box::new(|failure: TaskFailure<P, R>| {
                tracing::warn!(
                    task = %failure.task.display_name(),
                    id = failure.task.id(),
                    error = %failure.cause,
                    "task failed"
                );
            }),
            end: Box::new(|| tracing::info!("all tasks completed")),
        }
    }
}

impl<P, R> EventHub<P, R> {
    /// Registers `handler` under `name`. Returns `true` if it was installed.
    pub fn register(&mut self, name: &str, handler: Handler<P, R>) -> bool {
        let Ok(name) = name.parse::<EventName>() else {
            tracing::debug!(name, "ignoring callback with unknown event name");
            return false;
        };
        if handler.event_name() != name {
            tracing::warn!(
                %name,
                handler = %handler.event_name(),
                "ignoring callback registered under mismatched event name"
            );
            return false;
        }
        self.install(handler);
        true
    }

    /// Replaces the handler matching the handler's own kind.
    pub fn install(&mut self, handler: Handler<P, R>) {
        match handler {
            Handler::Success(f) => self.success = f,
            Handler::Error(f) => self.error = f,
            Handler::End(f) => self.end = f,
        }
    }

    pub fn notify_success(&mut self, ok: TaskSuccess<P, R>) {
        let f = &mut self.success;
        guard(EventName::Success, || f(ok));
    }

    pub fn notify_error(&mut self, failure: TaskFailure<P, R>) {
        let f = &mut self.error;
        guard(EventName::Error, || f(failure));
    }

    pub fn notify_drained(&mut self) {
        let f = &mut self.end;
        guard(EventName::End, f);
    }
}

/// Runs a user callback, containing a panic.
fn guard(name: EventName, f: impl FnOnce()) {
    if let Err(panic_err) = catch_unwind(AssertUnwindSafe(f)) {
        tracing::error!(
            callback = %name,
            info = %panic_message(&*panic_err),
            "callback panicked"
        );
    }
}
