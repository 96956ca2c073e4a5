//! Error types for Turnstile.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RegistrationError`] - Startup-time errors raised while mounting services
//! - [`AuthError`] - Authorization denials raised by the gate stage
//! - [`PipelineError`] - Errors raised while executing a compiled pipeline
//!
//! Registration errors are fatal: they abort startup and are never converted
//! into response envelopes. Pipeline errors propagate to a single terminal
//! reporting stage that turns them into a client-facing envelope.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while registering services, before any request is served.
///
/// Every variant indicates a defective service declaration. These must abort
/// process startup visibly; they are never caught per request.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A service was declared with an empty id.
    #[error("service id must not be empty")]
    EmptyServiceId,

    /// A service id collides with a name that has built-in meaning.
    #[error("service id `{0}` is reserved")]
    ReservedServiceId(String),

    /// Two services were registered under the same id.
    #[error("duplicate service id `{0}`")]
    DuplicateServiceId(String),

    /// An endpoint was declared with an empty id.
    #[error("service `{service}` declares an endpoint with an empty id")]
    EmptyEndpointId {
        /// The declaring service.
        service: String,
    },

    /// An endpoint was declared without a matching handler.
    #[error("endpoint `{service}.{endpoint}` has no registered handler")]
    MissingHandler {
        /// The declaring service.
        service: String,
        /// The endpoint without a handler.
        endpoint: String,
    },

    /// An auth rule is present but no identity provider was installed.
    #[error("endpoint `{service}.{endpoint}` has an auth rule but no identity provider is installed")]
    MissingIdentityProvider {
        /// The declaring service.
        service: String,
        /// The endpoint carrying the auth rule.
        endpoint: String,
    },
}

/// Reasons the authorization gate denies a request.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The bearer token failed verification.
    #[error("token verification failed")]
    TokenInvalid(#[source] BoxError),

    /// The endpoint is reserved for unsigned users but a token was presented.
    #[error("access reserved for unsigned users")]
    AnonymousOnly,

    /// The endpoint requires a signed-in identity and none was presented.
    #[error("access reserved for signed users")]
    SignedInRequired,

    /// The identity is missing at least one of the required roles.
    #[error("missing required roles: {0:?}")]
    MissingAllRoles(Vec<String>),

    /// The identity holds none of the accepted roles.
    #[error("missing any accepted role: {0:?}")]
    MissingAnyRole(Vec<String>),
}

/// Errors raised while executing a compiled pipeline for one request.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The authorization gate denied the request.
    #[error("authorization denied: {0}")]
    AuthDenied(#[from] AuthError),

    /// A before hook failed; the handler did not run.
    #[error("before hook failed")]
    BeforeHook(#[source] BoxError),

    /// The endpoint handler failed.
    #[error("handler failed")]
    Handler(#[source] BoxError),

    /// An after hook failed during result reduction.
    #[error("after hook failed")]
    AfterHook(#[source] BoxError),

    /// A pipeline was requested for a service or endpoint that is not mounted.
    #[error("unknown endpoint `{service}.{endpoint}`")]
    UnknownEndpoint {
        /// The requested service id.
        service: String,
        /// The requested endpoint id.
        endpoint: String,
    },
}
