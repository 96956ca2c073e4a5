//! The authorization gate stage.
//!
//! Inserted ahead of every user-supplied before hook when an endpoint
//! carries an auth rule. Token extraction and verification are delegated to
//! the installed identity provider; the gate only enforces the rule.

use std::sync::Arc;
use turnstile_core::{AuthError, AuthRule, Dialog, IdentityProvider, REQUIRE_ALL_ROLES};

/// A compiled authorization check for one endpoint.
pub struct AuthGate {
    rule: AuthRule,
    provider: Arc<dyn IdentityProvider>,
}

impl AuthGate {
    /// Bind a rule to the identity provider that will enforce it.
    pub fn new(rule: AuthRule, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { rule, provider }
    }

    /// The rule this gate enforces.
    pub fn rule(&self) -> &AuthRule {
        &self.rule
    }

    /// Run the gate for one request.
    ///
    /// An absent token is not an error by itself; the rule decides whether
    /// anonymity is acceptable. A token that fails verification always
    /// denies the request. On success the decoded identity is attached to
    /// the dialog for downstream stages.
    pub async fn check(&self, dialog: &Dialog) -> Result<(), AuthError> {
        let token = self.provider.populate_token(dialog.request());
        let identity = match &token {
            Some(raw) => Some(
                self.provider
                    .verify_token(raw)
                    .await
                    .map_err(AuthError::TokenInvalid)?,
            ),
            None => None,
        };

        if let Some(identity) = &identity {
            dialog.set_identity(identity.clone());
        }

        match (&self.rule, &identity) {
            (AuthRule::Anonymous, None) => Ok(()),
            (AuthRule::Anonymous, Some(_)) => Err(AuthError::AnonymousOnly),
            (AuthRule::SignedIn, Some(_)) => Ok(()),
            (AuthRule::SignedIn, None) | (AuthRule::Roles(_), None) => {
                Err(AuthError::SignedInRequired)
            }
            (AuthRule::Roles(list), Some(identity)) => {
                if list.first().map(String::as_str) == Some(REQUIRE_ALL_ROLES) {
                    let required = &list[1..];
                    if required.iter().all(|role| identity.has_role(role)) {
                        Ok(())
                    } else {
                        Err(AuthError::MissingAllRoles(required.to_vec()))
                    }
                } else if list.iter().any(|role| identity.has_role(role)) {
                    Ok(())
                } else {
                    Err(AuthError::MissingAnyRole(list.clone()))
                }
            }
        }
    }
}
