//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use turnstile::testing::StaticIdentityProvider;
use turnstile::{Identity, RequestParts};

/// Token decoding to an identity holding only the `admin` role.
pub const ADMIN_TOKEN: &str = "admin-token";

/// Token decoding to an identity holding `admin` and `billing`.
pub const BILLING_TOKEN: &str = "billing-token";

/// Token decoding to an identity holding only the `user` role.
pub const USER_TOKEN: &str = "user-token";

/// A token the provider rejects.
pub const BOGUS_TOKEN: &str = "bogus-token";

/// A provider accepting the fixture tokens above.
pub fn provider() -> StaticIdentityProvider {
    StaticIdentityProvider::new()
        .with_identity(ADMIN_TOKEN, Identity::with_roles(["admin"]))
        .with_identity(BILLING_TOKEN, Identity::with_roles(["admin", "billing"]))
        .with_identity(USER_TOKEN, Identity::with_roles(["user"]))
}

/// Attach a bearer token to request parts.
pub fn bearer(parts: RequestParts, token: &str) -> RequestParts {
    parts.header("Authorization", &format!("Bearer {token}"))
}
