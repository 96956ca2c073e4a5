//! # turnstile - Declarative Service Pipelines
//!
//! `turnstile` turns declarative service descriptions (endpoint names,
//! route patterns, authorization rules, before/after hooks) into compiled
//! per-route pipelines, and normalizes heterogeneous handler return values
//! into one canonical response envelope.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use turnstile::prelude::*;
//!
//! let users = ServiceDescriptor::builder("users")
//!     .basepath("/users")
//!     .endpoint("get", "GET /:id")
//!     .endpoint("create", "POST /")
//!     .handler("get", |inputs: Inputs, _dialog: Dialog| async move {
//!         Ok(serde_json::json!({ "id": inputs["id"] }))
//!     })
//!     .handler("create", |_inputs: Inputs, _dialog: Dialog| async move {
//!         Ok(serde_json::json!({ "id": 7 }))
//!     })
//!     .build();
//!
//! let registry = Registry::builder().register(users).build()?;
//!
//! // Hand registry.route_entries() to a transport adapter; each matching
//! // request builds a Dialog and executes the entry's compiled pipeline.
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use turnstile_core::{
    // Hooks
    AfterHook,
    // Authorization
    AuthError,
    AuthRule,
    BeforeHook,
    // Errors
    BoxError,
    // Dialog
    Dialog,
    DynAfterHook,
    DynBeforeHook,
    DynHandler,
    // Envelope
    Envelope,
    // Handler
    Handler,
    Identity,
    IdentityProvider,
    Inputs,
    Payload,
    PipelineError,
    PipelineState,
    REQUIRE_ALL_ROLES,
    RegistrationError,
    RequestParts,
    // Descriptors
    RouteSpec,
    ServiceDescriptor,
    ServiceDescriptorBuilder,
    WILDCARD,
};

pub use turnstile_std::auth::{extract_bearer_token, AuthGate};
pub use turnstile_std::pipeline::{CompiledPipeline, ResponseWrapper, RunOutcome};
pub use turnstile_std::registry::{Registry, RegistryBuilder, RESERVED_SERVICE_IDS};
pub use turnstile_std::report::{report, Environment};
pub use turnstile_std::routing::{RouteEntry, WILDCARD_METHODS};

/// Response envelope construction (`ok`, `ko`, named shorthands).
pub mod envelope {
    pub use turnstile_core::envelope::{
        accepted, bad_request, conflict, created, forbidden, internal_server_error,
        method_not_allowed, no_content, normalize, not_acceptable, not_found, not_implemented,
        ok, ok_with, payment_required, reason_phrase, request_timeout, respond,
        service_unavailable, shorthand, unauthorized, unprocessable_entity, ko, ko_with,
        SHORTHANDS,
    };
}

/// Route normalization helpers.
pub mod routing {
    pub use turnstile_std::routing::{
        expand_aliases, join_routes, normalize_slashes, parse_route, resolve_routes,
    };
}

/// Hook resolution helpers.
pub mod resolve {
    pub use turnstile_std::resolve::{resolve_after, resolve_auth, resolve_before};
}

/// Standard hook implementations.
pub mod hooks {
    pub use turnstile_std::hooks::{LoggingAfter, LoggingBefore};
    #[cfg(feature = "timeout")]
    pub use turnstile_std::hooks::{TimeoutBefore, TimeoutError};
}

/// Testing utilities.
pub mod testing {
    pub use turnstile_std::testing::{
        test_dialog, test_parts, FinishingBefore, RecordingAfter, RecordingBefore,
        StaticIdentityProvider, UnknownToken,
    };
}

/// Prelude module - common imports for Turnstile.
///
/// # Usage
///
/// ```rust,ignore
/// use turnstile::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AuthRule, BoxError, Dialog, Envelope, Handler, Identity, IdentityProvider, Inputs,
        Payload, Registry, RequestParts, ServiceDescriptor,
    };
    pub use turnstile_core::envelope::{ko, ok};
}
