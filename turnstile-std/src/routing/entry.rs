//! Flattened route entries handed to a transport adapter.

use crate::pipeline::CompiledPipeline;
use http::Method;
use std::sync::Arc;

/// One concrete `(method, path)` binding to a compiled pipeline.
///
/// An endpoint with several route patterns, or a wildcard method, produces
/// several entries that all share the same pipeline.
#[derive(Clone)]
pub struct RouteEntry {
    /// The HTTP method served by this entry.
    pub method: Method,
    /// The absolute, normalized, parameter-annotated path, e.g. `/users/:id`.
    pub path: String,
    /// The owning service id.
    pub service: String,
    /// The endpoint id within the service.
    pub endpoint: String,
    /// The compiled pipeline executed for matching requests.
    pub pipeline: Arc<CompiledPipeline>,
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
