use std::{
    any::Any,
    fmt::Display,
    panic::{AssertUnwindSafe, catch_unwind},
};

/// Marker for an error that escaped a fixture or a test body.
///
/// The message is kept for diagnostics only. Nothing in the run ever branches
/// on it; every fault is treated the same and handed to the
/// [`Control`](crate::control::Control).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    message: String,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        Self::new(downcast_panic_payload(payload))
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

pub(crate) fn downcast_panic_payload(payload: Box<dyn Any + Send + 'static>) -> String {
    payload
        .downcast::<&'static str>()
        .map(|s| s.to_string())
        .or_else(|payload| payload.downcast::<String>().map(|s| *s))
        .unwrap_or_else(|_| String::from("non-string panic payload"))
}

/// Run externally supplied code behind a recovery boundary.
///
/// Both a returned `Err` and an unwinding panic come back as `Err(Fault)`.
/// State the callable mutated before faulting is left as it is.
pub(crate) fn guard<F>(f: F) -> Result<(), Fault>
where
    F: FnOnce() -> Result<(), Fault>,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(Fault::from_panic(payload)))
}
