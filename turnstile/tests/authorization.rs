//! Authorization gate tests: public endpoints, signed/unsigned rules and
//! role-list semantics.

use http::Method;
use serde_json::{json, Value};
use turnstile::{
    AuthRule, BoxError, Dialog, Environment, Inputs, Registry, RequestParts, ServiceDescriptor,
};

mod common;
use common::{bearer, provider, ADMIN_TOKEN, BILLING_TOKEN, BOGUS_TOKEN, USER_TOKEN};

fn guarded_service() -> ServiceDescriptor {
    let handler = |_inputs: Inputs, dialog: Dialog| async move {
        Ok::<Value, BoxError>(json!({ "signed": dialog.identity().is_some() }))
    };

    ServiceDescriptor::builder("accounts")
        .basepath("/accounts")
        .endpoint("open", "GET /open")
        .endpoint("secure", "GET /secure")
        .endpoint("anon", "GET /anon")
        .endpoint("any", "GET /any")
        .endpoint("removeAll", "DELETE /")
        .handler("open", handler)
        .handler("secure", handler)
        .handler("anon", handler)
        .handler("any", handler)
        .handler("removeAll", handler)
        .auth("secure", true)
        .auth("anon", false)
        .auth("any", AuthRule::roles(["admin", "billing"]))
        .auth("removeAll", AuthRule::roles(["U", "admin", "billing"]))
        .build()
}

fn registry() -> Registry {
    Registry::builder()
        .register(guarded_service())
        .identity_provider(provider())
        .environment(Environment::Development)
        .build()
        .unwrap()
}

async fn call(registry: &Registry, endpoint: &str, parts: RequestParts) -> (Dialog, Option<turnstile::Envelope>) {
    let pipeline = registry.pipeline("accounts", endpoint).unwrap();
    let dialog = Dialog::new(parts);
    let envelope = pipeline.execute(&dialog).await;
    (dialog, envelope)
}

#[tokio::test]
async fn test_absent_rule_never_consults_identity() {
    let registry = registry();

    // No token at all.
    let (_, envelope) = call(
        &registry,
        "open",
        RequestParts::new(Method::GET, "/accounts/open"),
    )
    .await;
    assert!(envelope.unwrap().success);

    // Even an invalid token must still reach the handler.
    let (dialog, envelope) = call(
        &registry,
        "open",
        bearer(RequestParts::new(Method::GET, "/accounts/open"), BOGUS_TOKEN),
    )
    .await;
    assert!(envelope.unwrap().success);
    assert!(dialog.identity().is_none());
}

#[tokio::test]
async fn test_signed_in_required() {
    let registry = registry();

    let (_, envelope) = call(
        &registry,
        "secure",
        RequestParts::new(Method::GET, "/accounts/secure"),
    )
    .await;
    let envelope = envelope.unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.code, 403);

    let (dialog, envelope) = call(
        &registry,
        "secure",
        bearer(RequestParts::new(Method::GET, "/accounts/secure"), USER_TOKEN),
    )
    .await;
    let envelope = envelope.unwrap();
    assert!(envelope.success);
    assert_eq!(envelope.extra.get("signed"), Some(&json!(true)));
    assert!(dialog.identity().is_some());
}

#[tokio::test]
async fn test_anonymous_required() {
    let registry = registry();

    let (_, envelope) = call(
        &registry,
        "anon",
        RequestParts::new(Method::GET, "/accounts/anon"),
    )
    .await;
    assert!(envelope.unwrap().success);

    let (_, envelope) = call(
        &registry,
        "anon",
        bearer(RequestParts::new(Method::GET, "/accounts/anon"), USER_TOKEN),
    )
    .await;
    let envelope = envelope.unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.code, 403);
}

#[tokio::test]
async fn test_invalid_token_is_denied_with_detail() {
    let registry = registry();

    let (_, envelope) = call(
        &registry,
        "secure",
        bearer(RequestParts::new(Method::GET, "/accounts/secure"), BOGUS_TOKEN),
    )
    .await;
    let envelope = envelope.unwrap();
    assert_eq!(envelope.code, 403);
    let detail = envelope.extra.get("detail").and_then(Value::as_str).unwrap();
    assert!(detail.contains("unknown test token"));
}

#[tokio::test]
async fn test_role_list_allows_any_listed_role() {
    let registry = registry();

    let (_, envelope) = call(
        &registry,
        "any",
        bearer(RequestParts::new(Method::GET, "/accounts/any"), USER_TOKEN),
    )
    .await;
    assert_eq!(envelope.unwrap().code, 403);

    let (_, envelope) = call(
        &registry,
        "any",
        bearer(RequestParts::new(Method::GET, "/accounts/any"), ADMIN_TOKEN),
    )
    .await;
    assert!(envelope.unwrap().success);
}

#[tokio::test]
async fn test_conjunctive_role_list_requires_every_role() {
    let registry = registry();

    // `admin` alone is not enough for ["U", "admin", "billing"].
    let (_, envelope) = call(
        &registry,
        "removeAll",
        bearer(
            RequestParts::new(Method::DELETE, "/accounts"),
            ADMIN_TOKEN,
        ),
    )
    .await;
    assert_eq!(envelope.unwrap().code, 403);

    let (_, envelope) = call(
        &registry,
        "removeAll",
        bearer(
            RequestParts::new(Method::DELETE, "/accounts"),
            BILLING_TOKEN,
        ),
    )
    .await;
    assert!(envelope.unwrap().success);
}

#[tokio::test]
async fn test_wildcard_auth_rule_applies_to_every_endpoint() {
    let descriptor = ServiceDescriptor::builder("locked")
        .endpoint("get", "GET /")
        .handler("get", |_inputs: Inputs, _dialog: Dialog| async move {
            Ok::<Value, BoxError>(Value::Null)
        })
        .auth("*", true)
        .build();

    let registry = Registry::builder()
        .register(descriptor)
        .identity_provider(provider())
        .environment(Environment::Development)
        .build()
        .unwrap();

    let pipeline = registry.pipeline("locked", "get").unwrap();
    let dialog = Dialog::new(RequestParts::new(Method::GET, "/"));
    let envelope = pipeline.execute(&dialog).await.unwrap();
    assert_eq!(envelope.code, 403);
}

#[test]
fn test_auth_rule_without_provider_fails_registration() {
    let descriptor = ServiceDescriptor::builder("locked")
        .endpoint("get", "GET /")
        .handler("get", |_inputs: Inputs, _dialog: Dialog| async move {
            Ok::<Value, BoxError>(Value::Null)
        })
        .auth("get", true)
        .build();

    let error = Registry::builder().register(descriptor).build().unwrap_err();
    assert!(matches!(
        error,
        turnstile::RegistrationError::MissingIdentityProvider { .. }
    ));
}

#[tokio::test]
async fn test_token_from_query_string() {
    let registry = registry();

    let parts = RequestParts::new(Method::GET, "/accounts/secure")
        .query_param("access_token", USER_TOKEN);
    let (_, envelope) = call(&registry, "secure", parts).await;
    assert!(envelope.unwrap().success);
}
