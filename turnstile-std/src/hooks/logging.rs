//! Logging hooks for request observation.

use serde_json::Value;
use turnstile_core::{AfterHook, BeforeHook, BoxError, Dialog, Inputs};

/// A before hook that logs the resolved inputs for debugging/observation.
pub struct LoggingBefore;

impl BeforeHook for LoggingBefore {
    async fn call(&self, inputs: Inputs, dialog: Dialog) -> Result<Option<Inputs>, BoxError> {
        tracing::debug!(
            method = %dialog.request().method,
            path = %dialog.request().path,
            inputs = ?inputs,
            "handling request"
        );
        Ok(None)
    }
}

/// An after hook that logs the reduction accumulator as it passes through.
pub struct LoggingAfter;

impl AfterHook for LoggingAfter {
    async fn call(&self, result: Value, dialog: Dialog) -> Result<Value, BoxError> {
        tracing::debug!(
            method = %dialog.request().method,
            path = %dialog.request().path,
            result = ?result,
            "result reduced"
        );
        Ok(result)
    }
}
