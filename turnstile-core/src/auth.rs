//! # Authorization Model
//!
//! Per-endpoint authorization policy and the identity-provider seam.
//!
//! The core never parses or cryptographically verifies tokens itself; it
//! calls an [`IdentityProvider`] supplied at registration. An absent rule
//! means the endpoint is fully public and the pipeline never consults
//! identity at all.
//!
//! # Role lists
//!
//! A [`AuthRule::Roles`] list whose first entry is the literal
//! [`REQUIRE_ALL_ROLES`] marker requires every remaining role to be present
//! (logical AND). Any other list is satisfied by at least one listed role
//! (logical OR, the default semantics).

use crate::dialog::RequestParts;
use crate::error::BoxError;
use futures::future::BoxFuture;
use serde_json::{Map, Value};

/// Marker making a role list conjunctive: every remaining role is required.
pub const REQUIRE_ALL_ROLES: &str = "U";

/// Per-endpoint authorization policy. Absence of a rule means no gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRule {
    /// A valid signed-in identity is required.
    SignedIn,
    /// The request must carry no identity.
    Anonymous,
    /// A role check against the decoded identity.
    Roles(Vec<String>),
}

impl AuthRule {
    /// Build a role-list rule.
    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AuthRule::Roles(roles.into_iter().map(Into::into).collect())
    }

    /// Whether this is a conjunctive role list.
    pub fn requires_all_roles(&self) -> bool {
        match self {
            AuthRule::Roles(list) => list.first().map(String::as_str) == Some(REQUIRE_ALL_ROLES),
            _ => false,
        }
    }
}

impl From<bool> for AuthRule {
    fn from(signed_in: bool) -> Self {
        if signed_in {
            AuthRule::SignedIn
        } else {
            AuthRule::Anonymous
        }
    }
}

/// A decoded identity attached to the dialog by the authorization gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    claims: Map<String, Value>,
}

impl Identity {
    /// An identity with no claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an identity from decoded token claims.
    pub fn from_claims(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Build an identity holding the given roles.
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles: Vec<Value> = roles
            .into_iter()
            .map(|role| Value::String(role.into()))
            .collect();
        let mut claims = Map::new();
        claims.insert("roles".to_owned(), Value::Array(roles));
        Self { claims }
    }

    /// All decoded claims.
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// A single claim by name.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// The roles carried by the `roles` claim. Missing claim means no roles.
    pub fn roles(&self) -> Vec<&str> {
        self.claims
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| roles.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether the identity carries the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().contains(&role)
    }
}

/// External collaborator supplying token extraction and verification.
///
/// The gate calls [`populate_token`] first; an absent token is not an error
/// (the rule decides whether anonymity is acceptable). [`verify_token`] must
/// fail on an invalid token, which the gate surfaces as an
/// authorization-denied condition with the underlying error as detail.
///
/// [`populate_token`]: IdentityProvider::populate_token
/// [`verify_token`]: IdentityProvider::verify_token
pub trait IdentityProvider: Send + Sync + 'static {
    /// Extract a raw bearer token from the request, if one is present.
    fn populate_token(&self, parts: &RequestParts) -> Option<String>;

    /// Verify a token and decode the identity it carries.
    fn verify_token<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Identity, BoxError>>;
}
