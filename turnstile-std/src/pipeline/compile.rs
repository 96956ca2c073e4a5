//! Pipeline compilation.
//!
//! Assembles, once per endpoint, the ordered stage sequence the executor
//! runs for every matching request: auth gate, resolved before hooks, the
//! handler, resolved after hooks and the optional response wrapper.
//!
//! Compiled pipelines are immutable and shared via `Arc`: every route entry
//! of an endpoint, and every registry lookup, returns the same allocation.

use crate::auth::AuthGate;
use crate::report::Environment;
use crate::resolve::{resolve_after, resolve_auth, resolve_before};
use serde_json::Value;
use std::sync::Arc;
use turnstile_core::{
    Dialog, DynAfterHook, DynBeforeHook, DynHandler, IdentityProvider, RegistrationError,
    ServiceDescriptor,
};

/// A process-wide hook applied to the reduced result before delivery.
pub type ResponseWrapper = Arc<dyn Fn(Value, &Dialog) -> Value + Send + Sync>;

/// The memoized, ordered stage sequence produced for one endpoint.
pub struct CompiledPipeline {
    pub(crate) service: String,
    pub(crate) endpoint: String,
    pub(crate) gate: Option<AuthGate>,
    pub(crate) before: Vec<Arc<dyn DynBeforeHook>>,
    pub(crate) handler: Arc<dyn DynHandler>,
    pub(crate) after: Vec<Arc<dyn DynAfterHook>>,
    pub(crate) wrapper: Option<ResponseWrapper>,
    pub(crate) environment: Environment,
}

impl CompiledPipeline {
    /// Compile one endpoint of a service descriptor.
    ///
    /// Fails when the endpoint has no registered handler, or carries an
    /// auth rule while no identity provider is installed. Both are
    /// registration-time defects that must abort startup.
    pub fn compile(
        descriptor: &ServiceDescriptor,
        endpoint: &str,
        provider: Option<&Arc<dyn IdentityProvider>>,
        wrapper: Option<ResponseWrapper>,
        environment: Environment,
    ) -> Result<Arc<Self>, RegistrationError> {
        let handler =
            descriptor
                .handler(endpoint)
                .ok_or_else(|| RegistrationError::MissingHandler {
                    service: descriptor.id().to_owned(),
                    endpoint: endpoint.to_owned(),
                })?;

        let gate = match resolve_auth(descriptor, endpoint) {
            Some(rule) => {
                let provider =
                    provider
                        .cloned()
                        .ok_or_else(|| RegistrationError::MissingIdentityProvider {
                            service: descriptor.id().to_owned(),
                            endpoint: endpoint.to_owned(),
                        })?;
                Some(AuthGate::new(rule, provider))
            }
            None => None,
        };

        Ok(Arc::new(Self {
            service: descriptor.id().to_owned(),
            endpoint: endpoint.to_owned(),
            gate,
            before: resolve_before(descriptor, endpoint),
            handler,
            after: resolve_after(descriptor, endpoint),
            wrapper,
            environment,
        }))
    }

    /// The owning service id.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The endpoint id within the service.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether an authorization gate runs ahead of the before hooks.
    pub fn has_gate(&self) -> bool {
        self.gate.is_some()
    }
}

impl std::fmt::Debug for CompiledPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledPipeline")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .field("gate", &self.gate.is_some())
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}
