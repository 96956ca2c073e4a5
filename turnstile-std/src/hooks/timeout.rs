//! Timeout hook for time-limited execution.
//!
//! The executor itself imposes no per-request deadline; wrapping individual
//! hooks is the opt-in way to bound them.

use std::time::Duration;
use tokio::time::timeout;
use turnstile_core::{BeforeHook, BoxError, Dialog, Inputs};

/// Error returned when a wrapped hook times out.
#[derive(Debug, Clone)]
pub struct TimeoutError;

impl std::fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hook execution timed out")
    }
}

impl std::error::Error for TimeoutError {}

/// A before hook that wraps another before hook with a timeout.
pub struct TimeoutBefore<H> {
    inner: H,
    duration: Duration,
}

impl<H> TimeoutBefore<H> {
    /// Create a new timeout wrapper.
    pub fn new(inner: H, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<H: BeforeHook> BeforeHook for TimeoutBefore<H> {
    async fn call(&self, inputs: Inputs, dialog: Dialog) -> Result<Option<Inputs>, BoxError> {
        match timeout(self.duration, self.inner.call(inputs, dialog)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError)),
        }
    }
}
