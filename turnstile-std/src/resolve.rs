//! Hook resolution.
//!
//! Merges the wildcard and endpoint-specific hook declarations of a service
//! into the flat ordered sequences a pipeline executes. The asymmetry is
//! intentional: wildcard setup runs first, wildcard teardown runs last,
//! bracketing the endpoint-specific hooks.

use std::sync::Arc;
use turnstile_core::{AuthRule, DynAfterHook, DynBeforeHook, ServiceDescriptor, WILDCARD};

/// Resolved before hooks: wildcard hooks followed by endpoint hooks.
pub fn resolve_before(
    descriptor: &ServiceDescriptor,
    endpoint: &str,
) -> Vec<Arc<dyn DynBeforeHook>> {
    descriptor
        .before_hooks(WILDCARD)
        .iter()
        .chain(descriptor.before_hooks(endpoint))
        .cloned()
        .collect()
}

/// Resolved after hooks: endpoint hooks followed by wildcard hooks.
pub fn resolve_after(
    descriptor: &ServiceDescriptor,
    endpoint: &str,
) -> Vec<Arc<dyn DynAfterHook>> {
    descriptor
        .after_hooks(endpoint)
        .iter()
        .chain(descriptor.after_hooks(WILDCARD))
        .cloned()
        .collect()
}

/// Resolved auth rule: the endpoint rule, else the wildcard rule, else none.
pub fn resolve_auth(descriptor: &ServiceDescriptor, endpoint: &str) -> Option<AuthRule> {
    descriptor.auth_rule(endpoint).cloned()
}
