//! Service registration.
//!
//! The [`RegistryBuilder`] accumulates service descriptors; [`build`]
//! validates every declaration at startup, compiles each endpoint exactly
//! once and produces the immutable [`Registry`]: a flattened route table
//! for the transport adapter plus memoized pipeline lookups and the
//! in-process invocation path.
//!
//! [`build`]: RegistryBuilder::build

use crate::pipeline::{CompiledPipeline, ResponseWrapper, RunOutcome};
use crate::report::Environment;
use crate::routing::{expand_aliases, resolve_routes, RouteEntry};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use turnstile_core::{
    Dialog, IdentityProvider, PipelineError, RegistrationError, ServiceDescriptor, WILDCARD,
};

/// Service ids with built-in meaning that cannot be registered.
pub const RESERVED_SERVICE_IDS: [&str; 1] = [WILDCARD];

/// The immutable set of mounted services.
///
/// Built once at startup; safe to share across concurrent requests without
/// locking.
#[derive(Debug)]
pub struct Registry {
    entries: Vec<RouteEntry>,
    pipelines: HashMap<(String, String), Arc<CompiledPipeline>>,
    environment: Environment,
}

impl Registry {
    /// Start an empty registry builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The flattened route table, in registration order.
    pub fn route_entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// The compiled pipeline for an endpoint. Lookups are memoized: the
    /// same `Arc` is returned every time.
    pub fn pipeline(&self, service: &str, endpoint: &str) -> Option<Arc<CompiledPipeline>> {
        self.pipelines
            .get(&(service.to_owned(), endpoint.to_owned()))
            .cloned()
    }

    /// The environment error reporting runs under.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Invoke an endpoint in process, without a transport.
    ///
    /// Runs the pipeline up to the after-hook reduction and returns the
    /// reduced result. When a hook answered the request directly, the value
    /// it sent is returned instead (`Null` if it sent nothing).
    pub async fn invoke(
        &self,
        service: &str,
        endpoint: &str,
        dialog: &Dialog,
    ) -> Result<Value, PipelineError> {
        let pipeline =
            self.pipeline(service, endpoint)
                .ok_or_else(|| PipelineError::UnknownEndpoint {
                    service: service.to_owned(),
                    endpoint: endpoint.to_owned(),
                })?;

        match pipeline.run(dialog).await? {
            RunOutcome::Handled(value) => Ok(value),
            RunOutcome::Intercepted => Ok(dialog.result().unwrap_or(Value::Null)),
        }
    }
}

/// Builder for [`Registry`].
pub struct RegistryBuilder {
    descriptors: Vec<ServiceDescriptor>,
    provider: Option<Arc<dyn IdentityProvider>>,
    wrapper: Option<ResponseWrapper>,
    environment: Option<Environment>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Create a new empty registry builder.
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            provider: None,
            wrapper: None,
            environment: None,
        }
    }

    /// Register a service descriptor.
    pub fn register(mut self, descriptor: ServiceDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Install the identity provider backing every authorization gate.
    pub fn identity_provider<P: IdentityProvider>(mut self, provider: P) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Install a process-wide wrapper applied to every reduced result
    /// before delivery.
    pub fn response_wrapper<F>(mut self, wrapper: F) -> Self
    where
        F: Fn(Value, &Dialog) -> Value + Send + Sync + 'static,
    {
        self.wrapper = Some(Arc::new(wrapper));
        self
    }

    /// Pin the reporting environment instead of reading `TURNSTILE_ENV`.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Validate every declaration and compile the registry.
    ///
    /// Any [`RegistrationError`] must abort startup; none of them is
    /// recoverable per request.
    pub fn build(self) -> Result<Registry, RegistrationError> {
        let environment = self.environment.unwrap_or_else(Environment::from_env);
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::new();
        let mut pipelines: HashMap<(String, String), Arc<CompiledPipeline>> = HashMap::new();

        for descriptor in &self.descriptors {
            let service = descriptor.id();
            if service.is_empty() {
                return Err(RegistrationError::EmptyServiceId);
            }
            if RESERVED_SERVICE_IDS.contains(&service) {
                return Err(RegistrationError::ReservedServiceId(service.to_owned()));
            }
            if !seen.insert(service.to_owned()) {
                return Err(RegistrationError::DuplicateServiceId(service.to_owned()));
            }

            for (declared, spec) in descriptor.endpoints() {
                for endpoint in expand_aliases(declared) {
                    if endpoint.is_empty() {
                        return Err(RegistrationError::EmptyEndpointId {
                            service: service.to_owned(),
                        });
                    }

                    let key = (service.to_owned(), endpoint.clone());
                    let pipeline = match pipelines.get(&key) {
                        Some(compiled) => Arc::clone(compiled),
                        None => {
                            let compiled = CompiledPipeline::compile(
                                descriptor,
                                &endpoint,
                                self.provider.as_ref(),
                                self.wrapper.clone(),
                                environment,
                            )?;
                            pipelines.insert(key, Arc::clone(&compiled));
                            compiled
                        }
                    };

                    for (method, path) in resolve_routes(descriptor.basepath(), spec) {
                        tracing::debug!(
                            service,
                            endpoint = %endpoint,
                            method = %method,
                            path = %path,
                            "route mounted"
                        );
                        entries.push(RouteEntry {
                            method,
                            path,
                            service: service.to_owned(),
                            endpoint: endpoint.clone(),
                            pipeline: Arc::clone(&pipeline),
                        });
                    }
                }
            }
        }

        Ok(Registry {
            entries,
            pipelines,
            environment,
        })
    }
}
