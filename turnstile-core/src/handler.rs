//! # Handlers
//!
//! The terminal business-logic stage of an endpoint pipeline.
//!
//! A handler receives the fully resolved input mapping (after every before
//! hook has had its say) together with the dialog, and produces the raw
//! `data` value that seeds the after-hook reduction. Failure flows through
//! the `Err` channel; a handler has no other way to signal an error, which
//! replaces the permissive "return an error value instead of raising"
//! idiom with an explicit one.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|inputs, dialog| async move { ... }`
//! 2. **Struct implementation**: `impl Handler for MyHandler`

use crate::dialog::{Dialog, Inputs};
use crate::error::BoxError;
use serde_json::Value;
use std::{future::Future, pin::Pin};

/// The terminal endpoint stage of a pipeline.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Handler`",
    label = "missing `Handler` implementation",
    note = "Handlers receive `(Inputs, Dialog)` and resolve to `Result<Value, BoxError>`."
)]
pub trait Handler: Send + Sync + 'static {
    /// Execute the endpoint logic.
    fn call(
        &self,
        inputs: Inputs,
        dialog: Dialog,
    ) -> impl Future<Output = Result<Value, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Handler`].
///
/// Use this trait where handlers of different concrete types are stored in
/// a single collection and called uniformly.
pub trait DynHandler: Send + Sync + 'static {
    /// Execute the endpoint logic (dynamic dispatch version).
    fn call_dyn<'a>(
        &'a self,
        inputs: Inputs,
        dialog: Dialog,
    ) -> Pin<Box<dyn Future<Output = Result<Value, BoxError>> + Send + 'a>>;
}

impl<T: Handler> DynHandler for T {
    fn call_dyn<'a>(
        &'a self,
        inputs: Inputs,
        dialog: Dialog,
    ) -> Pin<Box<dyn Future<Output = Result<Value, BoxError>> + Send + 'a>> {
        Box::pin(self.call(inputs, dialog))
    }
}

// Blanket impl for closures
impl<F, Fut> Handler for F
where
    F: Fn(Inputs, Dialog) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    fn call(
        &self,
        inputs: Inputs,
        dialog: Dialog,
    ) -> impl Future<Output = Result<Value, BoxError>> + Send {
        (self)(inputs, dialog)
    }
}
