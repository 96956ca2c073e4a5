//! # Hooks
//!
//! Before and after interceptors running as part of an endpoint's pipeline.
//!
//! A before hook runs ahead of the handler. It receives the current input
//! mapping and the dialog, and may return a replacement mapping; returning
//! `None` passes the previous mapping through unchanged. A failing before
//! hook aborts the pipeline before the handler runs, and a before hook that
//! finishes the dialog short-circuits everything after it.
//!
//! An after hook is one step of a left fold over the handler's result:
//! it receives the current accumulator and returns the next one. Once the
//! dialog is finished the remaining steps are skipped, since the response
//! has already been sent.
//!
//! # Static vs Dynamic Dispatch
//!
//! Both traits use native `async fn` for zero-cost static dispatch. For
//! dynamic dispatch (hook sequences resolved at registration), use
//! [`DynBeforeHook`] and [`DynAfterHook`].

use crate::dialog::{Dialog, Inputs};
use crate::error::BoxError;
use serde_json::Value;
use std::{future::Future, pin::Pin};

/// A pre-handler interceptor.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `BeforeHook`",
    label = "missing `BeforeHook` implementation",
    note = "Before hooks receive `(Inputs, Dialog)` and resolve to `Result<Option<Inputs>, BoxError>`."
)]
pub trait BeforeHook: Send + Sync + 'static {
    /// Run ahead of the handler; `Some` replaces the input mapping.
    fn call(
        &self,
        inputs: Inputs,
        dialog: Dialog,
    ) -> impl Future<Output = Result<Option<Inputs>, BoxError>> + Send;
}

/// Dynamic object-safe version of [`BeforeHook`].
pub trait DynBeforeHook: Send + Sync + 'static {
    /// Run ahead of the handler (dynamic dispatch version).
    fn call_dyn<'a>(
        &'a self,
        inputs: Inputs,
        dialog: Dialog,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Inputs>, BoxError>> + Send + 'a>>;
}

impl<T: BeforeHook> DynBeforeHook for T {
    fn call_dyn<'a>(
        &'a self,
        inputs: Inputs,
        dialog: Dialog,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Inputs>, BoxError>> + Send + 'a>> {
        Box::pin(self.call(inputs, dialog))
    }
}

// Blanket impl for closures
impl<F, Fut> BeforeHook for F
where
    F: Fn(Inputs, Dialog) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Inputs>, BoxError>> + Send + 'static,
{
    fn call(
        &self,
        inputs: Inputs,
        dialog: Dialog,
    ) -> impl Future<Output = Result<Option<Inputs>, BoxError>> + Send {
        (self)(inputs, dialog)
    }
}

/// A post-handler reduction step.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `AfterHook`",
    label = "missing `AfterHook` implementation",
    note = "After hooks receive `(Value, Dialog)` and resolve to `Result<Value, BoxError>`."
)]
pub trait AfterHook: Send + Sync + 'static {
    /// Fold one step: receive the accumulator, return the next one.
    fn call(
        &self,
        result: Value,
        dialog: Dialog,
    ) -> impl Future<Output = Result<Value, BoxError>> + Send;
}

/// Dynamic object-safe version of [`AfterHook`].
pub trait DynAfterHook: Send + Sync + 'static {
    /// Fold one step (dynamic dispatch version).
    fn call_dyn<'a>(
        &'a self,
        result: Value,
        dialog: Dialog,
    ) -> Pin<Box<dyn Future<Output = Result<Value, BoxError>> + Send + 'a>>;
}

impl<T: AfterHook> DynAfterHook for T {
    fn call_dyn<'a>(
        &'a self,
        result: Value,
        dialog: Dialog,
    ) -> Pin<Box<dyn Future<Output = Result<Value, BoxError>> + Send + 'a>> {
        Box::pin(self.call(result, dialog))
    }
}

// Blanket impl for closures
impl<F, Fut> AfterHook for F
where
    F: Fn(Value, Dialog) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    fn call(
        &self,
        result: Value,
        dialog: Dialog,
    ) -> impl Future<Output = Result<Value, BoxError>> + Send {
        (self)(result, dialog)
    }
}
