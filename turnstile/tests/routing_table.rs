//! Route table tests: normalization, wildcard expansion, aliases and
//! registration-time validation.

use http::Method;
use serde_json::Value;
use std::sync::Arc;
use turnstile::{
    BoxError, Dialog, Inputs, Registry, RegistrationError, RouteSpec, ServiceDescriptor,
    WILDCARD_METHODS,
};

fn null_handler() -> impl Fn(Inputs, Dialog) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Value, BoxError>> + Send>>
       + Send
       + Sync
       + 'static {
    |_inputs, _dialog| Box::pin(async { Ok(Value::Null) })
}

#[test]
fn test_wildcard_method_expands_to_five_entries_sharing_one_pipeline() {
    let descriptor = ServiceDescriptor::builder("things")
        .basepath("/things")
        .endpoint("all", "* /")
        .handler("all", null_handler())
        .build();

    let registry = Registry::builder().register(descriptor).build().unwrap();
    let entries = registry.route_entries();

    assert_eq!(entries.len(), 5);
    let methods: Vec<Method> = entries.iter().map(|entry| entry.method.clone()).collect();
    assert_eq!(methods, WILDCARD_METHODS.to_vec());
    for entry in entries {
        assert_eq!(entry.path, "/things");
        assert!(Arc::ptr_eq(&entry.pipeline, &entries[0].pipeline));
    }
}

#[test]
fn test_basepath_and_route_are_slash_normalized() {
    let descriptor = ServiceDescriptor::builder("users")
        .basepath("users/")
        .endpoint("get", "GET //:id/")
        .endpoint("root", "/")
        .handler("get", null_handler())
        .handler("root", null_handler())
        .build();

    let registry = Registry::builder().register(descriptor).build().unwrap();
    let paths: Vec<&str> = registry
        .route_entries()
        .iter()
        .map(|entry| entry.path.as_str())
        .collect();

    assert_eq!(paths, vec!["/users/:id", "/users"]);
}

#[test]
fn test_method_list_and_multiple_patterns() {
    let descriptor = ServiceDescriptor::builder("things")
        .endpoint("edit", "PUT|PATCH /:id")
        .endpoint(
            "find",
            RouteSpec::from(vec!["GET /", "GET /search"]),
        )
        .handler("edit", null_handler())
        .handler("find", null_handler())
        .build();

    let registry = Registry::builder().register(descriptor).build().unwrap();
    let routes: Vec<(Method, &str)> = registry
        .route_entries()
        .iter()
        .map(|entry| (entry.method.clone(), entry.path.as_str()))
        .collect();

    assert_eq!(
        routes,
        vec![
            (Method::PUT, "/:id"),
            (Method::PATCH, "/:id"),
            (Method::GET, "/"),
            (Method::GET, "/search"),
        ]
    );
}

#[test]
fn test_pair_spec_registers_verbatim_methods() {
    let descriptor = ServiceDescriptor::builder("things")
        .endpoint(
            "ping",
            RouteSpec::from(vec![(Method::HEAD, "/ping"), (Method::GET, "/ping")]),
        )
        .handler("ping", null_handler())
        .build();

    let registry = Registry::builder().register(descriptor).build().unwrap();
    let methods: Vec<Method> = registry
        .route_entries()
        .iter()
        .map(|entry| entry.method.clone())
        .collect();
    assert_eq!(methods, vec![Method::HEAD, Method::GET]);
}

#[test]
fn test_alias_names_expand_into_separate_endpoints() {
    let descriptor = ServiceDescriptor::builder("things")
        .endpoint("get,fetch", "GET /:id")
        .handler("get", null_handler())
        .handler("fetch", null_handler())
        .build();

    let registry = Registry::builder().register(descriptor).build().unwrap();
    let entries = registry.route_entries();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].endpoint, "get");
    assert_eq!(entries[1].endpoint, "fetch");
    // Same route shape, separate compiled pipelines.
    assert_eq!(entries[0].path, entries[1].path);
    assert!(!Arc::ptr_eq(&entries[0].pipeline, &entries[1].pipeline));
}

#[test]
fn test_alias_without_handler_fails_registration() {
    let descriptor = ServiceDescriptor::builder("things")
        .endpoint("get,fetch", "GET /:id")
        .handler("get", null_handler())
        .build();

    let error = Registry::builder().register(descriptor).build().unwrap_err();
    assert!(matches!(
        error,
        RegistrationError::MissingHandler { endpoint, .. } if endpoint == "fetch"
    ));
}

#[test]
fn test_duplicate_service_id_fails_registration() {
    let build = || {
        ServiceDescriptor::builder("things")
            .endpoint("get", "GET /")
            .handler("get", null_handler())
            .build()
    };

    let error = Registry::builder()
        .register(build())
        .register(build())
        .build()
        .unwrap_err();
    assert!(matches!(
        error,
        RegistrationError::DuplicateServiceId(id) if id == "things"
    ));
}

#[test]
fn test_reserved_and_empty_service_ids_fail_registration() {
    let reserved = ServiceDescriptor::builder("*")
        .endpoint("get", "GET /")
        .handler("get", null_handler())
        .build();
    assert!(matches!(
        Registry::builder().register(reserved).build().unwrap_err(),
        RegistrationError::ReservedServiceId(_)
    ));

    let unnamed = ServiceDescriptor::builder("")
        .endpoint("get", "GET /")
        .handler("get", null_handler())
        .build();
    assert!(matches!(
        Registry::builder().register(unnamed).build().unwrap_err(),
        RegistrationError::EmptyServiceId
    ));
}

#[test]
fn test_empty_endpoint_id_fails_registration() {
    let descriptor = ServiceDescriptor::builder("things")
        .endpoint("  ", "GET /")
        .build();

    let error = Registry::builder().register(descriptor).build().unwrap_err();
    assert!(matches!(error, RegistrationError::EmptyEndpointId { .. }));
}
