use std::fmt::{Debug, Display};

// Meant for the tail of handler chains, where an error has nowhere left to go but the log
pub trait ForwardRefToTracing<T, E> {
    fn trace_err(self) -> Result<T, E>;
    fn trace_err_ok(self) -> Option<T>;
    fn trace_err_with(self, what: impl Display) -> Option<T>;
}

impl<T, E> ForwardRefToTracing<T, E> for Result<T, E>
where
    E: Debug,
{
    fn trace_err(self) -> Result<T, E> {
        self.inspect_err(|e| tracing::error!("{:?}", e))
    }

    fn trace_err_ok(self) -> Option<T> {
        self.trace_err().ok()
    }

    /// Like [`ForwardRefToTracing::trace_err_ok`], prefixed with what was being attempted.
    fn trace_err_with(self, what: impl Display) -> Option<T> {
        self.inspect_err(|e| tracing::error!("{what}: {:?}", e))
            .ok()
    }
}
