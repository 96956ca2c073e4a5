//! # Dialog Context
//!
//! The per-request mutable state threaded through a compiled pipeline.
//!
//! A [`Dialog`] is created by the transport adapter from the raw request,
//! handed to every stage of the pipeline in order, and dropped once the
//! response has been delivered or the failure has been reported. It carries
//! the merged input parameters, the evolving result value, the `finished`
//! flag and the decoded identity.
//!
//! # Sharing
//!
//! `Dialog` is a cheap handle (`Arc` inside) so erased stages and closures
//! can hold it without lifetime plumbing. One pipeline execution is strictly
//! sequential, so the interior locks are never contended; the handle must
//! not be shared across requests.

use crate::auth::Identity;
use crate::envelope::{self, Envelope, Payload};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The merged input mapping handed to hooks and handlers.
///
/// Keys are unique; when the same key appears in several request sources the
/// later source wins: path parameters over query parameters over body fields.
pub type Inputs = Map<String, Value>;

/// The decomposed request a transport adapter hands to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
    /// Request method.
    pub method: Method,
    /// Request path as matched by the transport, e.g. `/users/7`.
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Parsed cookies.
    pub cookies: HashMap<String, String>,
    /// Parameters bound from the route pattern, e.g. `:id`.
    pub path_params: Inputs,
    /// Parsed query-string parameters.
    pub query: Inputs,
    /// Parsed body fields.
    pub body: Inputs,
}

impl RequestParts {
    /// Create request parts for the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a header. Invalid header names or values are discarded.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add a parsed cookie.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Add a path parameter.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Add a body field.
    pub fn body_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Merge body, query and path parameters into one input mapping.
    ///
    /// Path parameters win over query parameters, which win over body fields.
    pub fn merged_inputs(&self) -> Inputs {
        let mut inputs = self.body.clone();
        inputs.extend(self.query.clone());
        inputs.extend(self.path_params.clone());
        inputs
    }
}

/// Execution state of a pipeline run, tracked on the [`Dialog`].
///
/// States advance strictly forward; `Aborted` is terminal and reachable from
/// any non-terminal state (a stage error, or `finished` observed outside the
/// delivery transition). Once `Delivered` or `Aborted`, no further stage
/// executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Execution has not started.
    #[default]
    Pending,
    /// The authorization gate is running.
    Authorizing,
    /// Before hooks are running.
    BeforeHooks,
    /// The endpoint handler is running.
    Handling,
    /// After hooks are reducing the result.
    AfterHooks,
    /// The response envelope was delivered.
    Delivered,
    /// Execution stopped before delivery.
    Aborted,
}

struct DialogInner {
    parts: RequestParts,
    inputs: Inputs,
    data: Mutex<Option<Value>>,
    result: Mutex<Option<Value>>,
    finished: AtomicBool,
    status: Mutex<Option<StatusCode>>,
    identity: Mutex<Option<Identity>>,
    state: Mutex<PipelineState>,
}

/// Per-request state threaded through every pipeline stage.
#[derive(Clone)]
pub struct Dialog {
    inner: Arc<DialogInner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Dialog {
    /// Create a fresh dialog for one request.
    pub fn new(parts: RequestParts) -> Self {
        let inputs = parts.merged_inputs();
        Self {
            inner: Arc::new(DialogInner {
                parts,
                inputs,
                data: Mutex::new(None),
                result: Mutex::new(None),
                finished: AtomicBool::new(false),
                status: Mutex::new(None),
                identity: Mutex::new(None),
                state: Mutex::new(PipelineState::Pending),
            }),
        }
    }

    /// The decomposed request this dialog was built from.
    pub fn request(&self) -> &RequestParts {
        &self.inner.parts
    }

    /// The initial merged input mapping.
    pub fn inputs(&self) -> &Inputs {
        &self.inner.inputs
    }

    /// Whether a response has already been physically sent.
    pub fn finished(&self) -> bool {
        self.inner.finished.load(Ordering::SeqCst)
    }

    /// Mark the response as sent. No later stage may mutate the result.
    pub fn finish(&self) {
        self.inner.finished.store(true, Ordering::SeqCst);
    }

    /// Send a response value directly, bypassing the remaining stages.
    ///
    /// Returns `false` when a response was already sent, in which case the
    /// value is dropped.
    pub fn send(&self, value: Value) -> bool {
        if self.inner.finished.swap(true, Ordering::SeqCst) {
            return false;
        }
        *lock(&self.inner.result) = Some(value);
        true
    }

    /// The explicit status set on this dialog, if any.
    pub fn status(&self) -> Option<StatusCode> {
        *lock(&self.inner.status)
    }

    /// Set an explicit status. It takes precedence over envelope defaults.
    pub fn set_status(&self, status: StatusCode) {
        *lock(&self.inner.status) = Some(status);
    }

    /// The decoded identity attached by the authorization gate, if any.
    pub fn identity(&self) -> Option<Identity> {
        lock(&self.inner.identity).clone()
    }

    /// Attach the decoded identity for downstream stages.
    pub fn set_identity(&self, identity: Identity) {
        *lock(&self.inner.identity) = Some(identity);
    }

    /// The handler's raw return value, once the handler has run.
    pub fn data(&self) -> Option<Value> {
        lock(&self.inner.data).clone()
    }

    /// Record the handler's raw return value.
    pub fn set_data(&self, data: Value) {
        *lock(&self.inner.data) = Some(data);
    }

    /// The reduced result, once the after hooks have run.
    pub fn result(&self) -> Option<Value> {
        lock(&self.inner.result).clone()
    }

    /// Record the reduced result.
    pub fn set_result(&self, result: Value) {
        *lock(&self.inner.result) = Some(result);
    }

    /// Current execution state.
    pub fn state(&self) -> PipelineState {
        *lock(&self.inner.state)
    }

    /// Advance the execution state.
    pub fn set_state(&self, state: PipelineState) {
        *lock(&self.inner.state) = state;
    }

    /// Build a success envelope, honoring any explicit status on this dialog.
    pub fn ok(&self, payload: impl Into<Payload>) -> Envelope {
        self.finalize(envelope::DEFAULT_OK_STATUS, payload.into(), None, None)
    }

    /// Build a success envelope with message and extra-field overrides.
    pub fn ok_with(
        &self,
        payload: impl Into<Payload>,
        message: Option<&str>,
        extra: Option<Inputs>,
    ) -> Envelope {
        self.finalize(
            envelope::DEFAULT_OK_STATUS,
            payload.into(),
            message.map(str::to_owned),
            extra,
        )
    }

    /// Build a failure envelope, honoring any explicit status on this dialog.
    pub fn ko(&self, payload: impl Into<Payload>) -> Envelope {
        self.finalize(envelope::DEFAULT_ERROR_STATUS, payload.into(), None, None)
    }

    /// Build a failure envelope with message and extra-field overrides.
    pub fn ko_with(
        &self,
        payload: impl Into<Payload>,
        message: Option<&str>,
        extra: Option<Inputs>,
    ) -> Envelope {
        self.finalize(
            envelope::DEFAULT_ERROR_STATUS,
            payload.into(),
            message.map(str::to_owned),
            extra,
        )
    }

    /// Build an envelope through a named shorthand, e.g. `"notFound"`.
    ///
    /// Returns `None` for names absent from [`envelope::SHORTHANDS`].
    pub fn reply(&self, name: &str, payload: impl Into<Payload>) -> Option<Envelope> {
        let code = *envelope::SHORTHANDS.get(name)?;
        Some(self.respond_with_code(code, payload.into()))
    }

    fn respond_with_code(&self, code: u16, payload: Payload) -> Envelope {
        let default_code = if code < envelope::SUCCESS_WHEN_STATUS_LT {
            envelope::DEFAULT_OK_STATUS
        } else {
            envelope::DEFAULT_ERROR_STATUS
        };
        let (message, extra) = match payload {
            Payload::Text(text) => (Some(text), None),
            Payload::Fields(map) => (None, Some(map)),
            Payload::Code(_) => (None, None),
        };
        self.finalize(default_code, Payload::Code(code), message, extra)
    }

    fn finalize(
        &self,
        default_code: u16,
        payload: Payload,
        message: Option<String>,
        extra: Option<Inputs>,
    ) -> Envelope {
        // A status equal to the plain success default carries no override
        // intent; anything else set earlier wins over the caller's code.
        let explicit = self
            .status()
            .map(|status| status.as_u16())
            .filter(|&code| code != envelope::DEFAULT_OK_STATUS);
        let built = envelope::normalize(payload, message, extra, default_code, explicit);
        if let Ok(status) = StatusCode::from_u16(built.code) {
            self.set_status(status);
        }
        built
    }
}

impl std::fmt::Debug for Dialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialog")
            .field("method", &self.inner.parts.method)
            .field("path", &self.inner.parts.path)
            .field("finished", &self.finished())
            .field("state", &self.state())
            .finish()
    }
}
