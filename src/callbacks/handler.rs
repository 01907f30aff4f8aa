use std::fmt;
use std::str::FromStr;

use crate::error::TaskFailure;
use crate::tasks::TaskRecord;

/// Payload of the success callback: the settled task together with its result.
pub struct TaskSuccess<P, R> {
    /// The task that completed.
    pub task: TaskRecord<P, R>,
    /// What its executor produced.
    pub result: R,
}

pub(crate) type SuccessFn<P, R> = Box<dyn FnMut(TaskSuccess<P, R>) + Send>;
pub(crate) type ErrorFn<P, R> = Box<dyn FnMut(TaskFailure<P, R>) + Send>;
pub(crate) type EndFn = Box<dyn FnMut() + Send>;

/// Name of a registrable callback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// A task settled with a result.
    Success,
    /// A task settled with an error.
    Error,
    /// Queue and busy set drained.
    End,
}

impl EventName {
    /// Stable uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Success => "SUCCESS",
            EventName::Error => "ERROR",
            EventName::End => "END",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized callback name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventName(pub String);

impl FromStr for EventName {
    type Err = UnknownEventName;

    /// Case-insensitive: `"success"`, `"Error"`, `"END"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("success") {
            Ok(EventName::Success)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(EventName::Error)
        } else if s.eq_ignore_ascii_case("end") {
            Ok(EventName::End)
        } else {
            Err(UnknownEventName(s.to_string()))
        }
    }
}

/// A callback ready to be registered under an [`EventName`].
///
/// ## Example
/// ```rust
/// use slotpool::{EventName, Handler};
///
/// let h: Handler<u32, u32> = Handler::success(|ok| println!("task {} -> {}", ok.task.id(), ok.result));
/// assert_eq!(h.event_name(), EventName::Success);
/// ```
pub enum Handler<P, R> {
    /// Called once per successful task.
    Success(SuccessFn<P, R>),
    /// Called once per failed task.
    Error(ErrorFn<P, R>),
    /// Called once per drain.
    End(EndFn),
}

impl<P, R> Handler<P, R> {
    pub fn success(f: impl FnMut(TaskSuccess<P, R>) + Send + 'static) -> Self {
        Handler::Success(Box::new(f))
    }

    pub fn error(f: impl FnMut(TaskFailure<P, R>) + Send + 'static) -> Self {
        Handler::Error(Box::new(f))
    }

    pub fn end(f: impl FnMut() + Send + 'static) -> Self {
        Handler::End(Box::new(f))
    }

    /// The slot this handler fits.
    pub fn event_name(&self) -> EventName {
        match self {
            Handler::Success(_) => EventName::Success,
            Handler::Error(_) => EventName::Error,
            Handler::End(_) => EventName::End,
        }
    }
}
