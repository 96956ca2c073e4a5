//! Testing utilities for Turnstile.
//!
//! This module provides test doubles for exercising pipelines without a
//! transport or a real identity backend.
//!
//! # Features
//!
//! - [`RecordingBefore`]: a before hook that records the inputs it receives
//! - [`RecordingAfter`]: an after hook that records the fold accumulators
//! - [`FinishingBefore`]: a before hook that answers the request directly
//! - [`StaticIdentityProvider`]: a fixed token-to-identity table
//! - [`test_parts`] / [`test_dialog`]: request and dialog constructors

use crate::auth::extract_bearer_token;
use futures::future::BoxFuture;
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use turnstile_core::{
    AfterHook, BeforeHook, BoxError, Dialog, Identity, IdentityProvider, Inputs, RequestParts,
};

// ============================================================================
// Request and dialog constructors
// ============================================================================

/// Request parts for the given method and path.
pub fn test_parts(method: Method, path: &str) -> RequestParts {
    RequestParts::new(method, path)
}

/// A fresh dialog around the given request parts.
pub fn test_dialog(parts: RequestParts) -> Dialog {
    Dialog::new(parts)
}

// ============================================================================
// Recording hooks
// ============================================================================

/// A before hook that records every input mapping it receives.
///
/// Optionally returns a fixed replacement mapping, to exercise the
/// pass-the-inputs-forward contract.
pub struct RecordingBefore {
    seen: Arc<Mutex<Vec<Inputs>>>,
    replacement: Option<Inputs>,
}

impl RecordingBefore {
    /// A recording hook that passes inputs through unchanged.
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            replacement: None,
        }
    }

    /// A recording hook that replaces the inputs with a fixed mapping.
    pub fn with_replacement(replacement: Inputs) -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            replacement: Some(replacement),
        }
    }

    /// The recorded input mappings.
    pub fn seen(&self) -> Vec<Inputs> {
        self.seen.lock().unwrap().clone()
    }

    /// How many times the hook ran.
    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Default for RecordingBefore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordingBefore {
    fn clone(&self) -> Self {
        Self {
            seen: self.seen.clone(),
            replacement: self.replacement.clone(),
        }
    }
}

impl BeforeHook for RecordingBefore {
    async fn call(&self, inputs: Inputs, _dialog: Dialog) -> Result<Option<Inputs>, BoxError> {
        self.seen.lock().unwrap().push(inputs);
        Ok(self.replacement.clone())
    }
}

/// An after hook that records every accumulator it receives.
///
/// Optionally substitutes a fixed value for the accumulator it returns.
pub struct RecordingAfter {
    seen: Arc<Mutex<Vec<Value>>>,
    substitute: Option<Value>,
}

impl RecordingAfter {
    /// A recording hook that passes the accumulator through unchanged.
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            substitute: None,
        }
    }

    /// A recording hook that replaces the accumulator with a fixed value.
    pub fn with_substitute(substitute: Value) -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            substitute: Some(substitute),
        }
    }

    /// The recorded accumulators.
    pub fn seen(&self) -> Vec<Value> {
        self.seen.lock().unwrap().clone()
    }

    /// How many times the hook ran.
    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Default for RecordingAfter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordingAfter {
    fn clone(&self) -> Self {
        Self {
            seen: self.seen.clone(),
            substitute: self.substitute.clone(),
        }
    }
}

impl AfterHook for RecordingAfter {
    async fn call(&self, result: Value, _dialog: Dialog) -> Result<Value, BoxError> {
        self.seen.lock().unwrap().push(result.clone());
        Ok(self.substitute.clone().unwrap_or(result))
    }
}

// ============================================================================
// Finishing hook
// ============================================================================

/// A before hook that sends a response directly, short-circuiting the
/// handler and every hook after it.
pub struct FinishingBefore {
    value: Value,
}

impl FinishingBefore {
    /// A hook that answers every request with the given value.
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl BeforeHook for FinishingBefore {
    async fn call(&self, _inputs: Inputs, dialog: Dialog) -> Result<Option<Inputs>, BoxError> {
        dialog.send(self.value.clone());
        Ok(None)
    }
}

// ============================================================================
// Static identity provider
// ============================================================================

/// Error returned for tokens absent from a [`StaticIdentityProvider`].
#[derive(Debug, Clone, Error)]
#[error("unknown test token")]
pub struct UnknownToken;

/// An identity provider backed by a fixed token-to-identity table.
///
/// Token extraction uses the standard bearer sources; verification is a
/// table lookup, failing with [`UnknownToken`] for anything unlisted.
#[derive(Default)]
pub struct StaticIdentityProvider {
    identities: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    /// An empty provider that rejects every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as the given identity.
    pub fn with_identity(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.identities.insert(token.into(), identity);
        self
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn populate_token(&self, parts: &RequestParts) -> Option<String> {
        extract_bearer_token(parts)
    }

    fn verify_token<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Identity, BoxError>> {
        let verdict = self
            .identities
            .get(token)
            .cloned()
            .ok_or_else(|| Box::new(UnknownToken) as BoxError);
        Box::pin(async move { verdict })
    }
}
