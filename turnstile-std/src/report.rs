//! Terminal error reporting.
//!
//! The single stage every pipeline failure funnels into. It converts a
//! [`PipelineError`] into a well-formed client envelope with `code >= 400`,
//! attaching diagnostic detail only outside production. Server-side errors
//! are always logged with full detail regardless of environment.

use serde_json::{Map, Value};
use std::error::Error;
use turnstile_core::{envelope, Dialog, Envelope, PipelineError};

/// The runtime environment gating diagnostic detail in error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Diagnostic detail is attached to error envelopes.
    #[default]
    Development,
    /// Clients only see the canonical error shape.
    Production,
}

impl Environment {
    /// Resolve from the `TURNSTILE_ENV` variable; anything but
    /// `"production"` is development.
    pub fn from_env() -> Self {
        match std::env::var("TURNSTILE_ENV") {
            Ok(value) if value.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// Whether diagnostic detail must be withheld.
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

fn status_for(error: &PipelineError) -> u16 {
    match error {
        PipelineError::AuthDenied(_) => 403,
        PipelineError::UnknownEndpoint { .. } => 404,
        PipelineError::BeforeHook(_)
        | PipelineError::Handler(_)
        | PipelineError::AfterHook(_) => 500,
    }
}

// The full source chain, outermost first.
fn detail_chain(error: &PipelineError) -> String {
    let mut detail = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

/// Convert a pipeline failure into its client envelope.
///
/// Client errors (< 500) carry their denial reason as the message; server
/// errors expose only the canonical reason phrase in production. The
/// explicit status on the dialog, when set by an earlier stage, still wins
/// over the mapped code.
pub fn report(error: &PipelineError, dialog: &Dialog, environment: Environment) -> Envelope {
    let code = status_for(error);
    let detail = detail_chain(error);

    if code >= 500 {
        tracing::error!(code, detail = %detail, "pipeline stage failed");
    } else {
        tracing::debug!(code, detail = %detail, "request rejected");
    }

    let message = if code < 500 {
        Some(error.to_string())
    } else if environment.is_production() {
        envelope::reason_phrase(code)
    } else {
        Some(error.to_string())
    };

    let mut extra = Map::new();
    if !environment.is_production() {
        extra.insert("detail".to_owned(), Value::String(detail));
    }

    dialog.ko_with(code, message.as_deref(), Some(extra))
}
