//! # Service Descriptors
//!
//! The declarative description a service author registers: endpoint names,
//! route patterns, authorization rules and before/after hooks.
//!
//! A descriptor is built once through [`ServiceDescriptorBuilder`] and is
//! immutable afterwards. Handlers are an explicit mapping from endpoint id
//! to a typed function; the registry validates at startup that every
//! declared endpoint has one. Hook and auth maps accept the [`WILDCARD`]
//! key as the default applied to every endpoint.

use crate::auth::AuthRule;
use crate::handler::DynHandler;
use crate::hook::{DynAfterHook, DynBeforeHook};
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// Map key applying a declaration to every endpoint of the service.
pub const WILDCARD: &str = "*";

/// Route declarations for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSpec {
    /// A single route string, e.g. `"POST /:id"` or `"/"`.
    Pattern(String),
    /// Several route strings sharing the endpoint.
    Patterns(Vec<String>),
    /// Pre-split method and path pairs.
    Pairs(Vec<(Method, String)>),
}

impl From<&str> for RouteSpec {
    fn from(pattern: &str) -> Self {
        RouteSpec::Pattern(pattern.to_owned())
    }
}

impl From<String> for RouteSpec {
    fn from(pattern: String) -> Self {
        RouteSpec::Pattern(pattern)
    }
}

impl From<Vec<&str>> for RouteSpec {
    fn from(patterns: Vec<&str>) -> Self {
        RouteSpec::Patterns(patterns.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<String>> for RouteSpec {
    fn from(patterns: Vec<String>) -> Self {
        RouteSpec::Patterns(patterns)
    }
}

impl From<Vec<(Method, String)>> for RouteSpec {
    fn from(pairs: Vec<(Method, String)>) -> Self {
        RouteSpec::Pairs(pairs)
    }
}

impl From<Vec<(Method, &str)>> for RouteSpec {
    fn from(pairs: Vec<(Method, &str)>) -> Self {
        RouteSpec::Pairs(
            pairs
                .into_iter()
                .map(|(method, path)| (method, path.to_owned()))
                .collect(),
        )
    }
}

/// An immutable service declaration, ready for registration.
pub struct ServiceDescriptor {
    id: String,
    basepath: String,
    endpoints: Vec<(String, RouteSpec)>,
    handlers: HashMap<String, Arc<dyn DynHandler>>,
    before: HashMap<String, Vec<Arc<dyn DynBeforeHook>>>,
    after: HashMap<String, Vec<Arc<dyn DynAfterHook>>>,
    auth: HashMap<String, AuthRule>,
}

impl ServiceDescriptor {
    /// Start building a descriptor for the given service id.
    pub fn builder(id: impl Into<String>) -> ServiceDescriptorBuilder {
        ServiceDescriptorBuilder {
            id: id.into(),
            basepath: "/".to_owned(),
            endpoints: Vec::new(),
            handlers: HashMap::new(),
            before: HashMap::new(),
            after: HashMap::new(),
            auth: HashMap::new(),
        }
    }

    /// The service id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw URL prefix shared by every route of the service.
    pub fn basepath(&self) -> &str {
        &self.basepath
    }

    /// Endpoint declarations in registration order. Names may still contain
    /// comma-separated aliases; the registry expands them.
    pub fn endpoints(&self) -> &[(String, RouteSpec)] {
        &self.endpoints
    }

    /// The handler registered for an endpoint id, if any.
    pub fn handler(&self, endpoint: &str) -> Option<Arc<dyn DynHandler>> {
        self.handlers.get(endpoint).cloned()
    }

    /// Before hooks declared for a target (an endpoint id or [`WILDCARD`]).
    pub fn before_hooks(&self, target: &str) -> &[Arc<dyn DynBeforeHook>] {
        self.before.get(target).map_or(&[], Vec::as_slice)
    }

    /// After hooks declared for a target (an endpoint id or [`WILDCARD`]).
    pub fn after_hooks(&self, target: &str) -> &[Arc<dyn DynAfterHook>] {
        self.after.get(target).map_or(&[], Vec::as_slice)
    }

    /// The auth rule declared for an endpoint, falling back to the wildcard
    /// rule. `None` means the endpoint is fully public.
    pub fn auth_rule(&self, endpoint: &str) -> Option<&AuthRule> {
        self.auth
            .get(endpoint)
            .or_else(|| self.auth.get(WILDCARD))
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("id", &self.id)
            .field("basepath", &self.basepath)
            .field(
                "endpoints",
                &self
                    .endpoints
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`ServiceDescriptor`].
pub struct ServiceDescriptorBuilder {
    id: String,
    basepath: String,
    endpoints: Vec<(String, RouteSpec)>,
    handlers: HashMap<String, Arc<dyn DynHandler>>,
    before: HashMap<String, Vec<Arc<dyn DynBeforeHook>>>,
    after: HashMap<String, Vec<Arc<dyn DynAfterHook>>>,
    auth: HashMap<String, AuthRule>,
}

impl ServiceDescriptorBuilder {
    /// Set the URL prefix shared by every route of the service.
    pub fn basepath(mut self, basepath: impl Into<String>) -> Self {
        self.basepath = basepath.into();
        self
    }

    /// Declare an endpoint with its routes. A comma-separated name declares
    /// several aliases sharing the same routes.
    pub fn endpoint(mut self, name: impl Into<String>, routes: impl Into<RouteSpec>) -> Self {
        self.endpoints.push((name.into(), routes.into()));
        self
    }

    /// Register the handler for an endpoint id.
    pub fn handler<H: DynHandler>(mut self, endpoint: impl Into<String>, handler: H) -> Self {
        self.handlers.insert(endpoint.into(), Arc::new(handler));
        self
    }

    /// Append a before hook for a target (an endpoint id or [`WILDCARD`]).
    pub fn before<H: DynBeforeHook>(mut self, target: impl Into<String>, hook: H) -> Self {
        self.before
            .entry(target.into())
            .or_default()
            .push(Arc::new(hook));
        self
    }

    /// Append an after hook for a target (an endpoint id or [`WILDCARD`]).
    pub fn after<H: DynAfterHook>(mut self, target: impl Into<String>, hook: H) -> Self {
        self.after
            .entry(target.into())
            .or_default()
            .push(Arc::new(hook));
        self
    }

    /// Set the auth rule for a target (an endpoint id or [`WILDCARD`]).
    ///
    /// `bool` converts: `true` requires a signed-in identity, `false`
    /// requires anonymity.
    pub fn auth(mut self, target: impl Into<String>, rule: impl Into<AuthRule>) -> Self {
        self.auth.insert(target.into(), rule.into());
        self
    }

    /// Finish the declaration. Validation happens at registration.
    pub fn build(self) -> ServiceDescriptor {
        ServiceDescriptor {
            id: self.id,
            basepath: self.basepath,
            endpoints: self.endpoints,
            handlers: self.handlers,
            before: self.before,
            after: self.after,
            auth: self.auth,
        }
    }
}
