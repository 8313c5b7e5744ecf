// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configurations and identities shared by the suites.

use std::time::Duration;

use warden_api::TokenAuthority;
use warden_config::{AuthorityConfig, ResourceConfig, TokenConfig};
use warden_core::protocol::TokenValidation;
use warden_core::{AccountId, AuthContext, Identity, Role};

/// Signing secret used by every test authority.
pub const TEST_TOKEN_SECRET: &str = "integration-secret-that-is-long-enough-for-hs256";

/// Cipher secret used by every test resource server.
pub const TEST_CIPHER_SECRET: &str = "integration-cipher-secret";

/// Email that registers as ADMIN on test authorities.
pub const ADMIN_EMAIL: &str = "root@example.com";

/// An address nothing listens on.
pub const UNREACHABLE_AUTHORITY: &str = "http://127.0.0.1:9";

/// Token settings for tests.
pub fn token_config() -> TokenConfig {
    TokenConfig::new(TEST_TOKEN_SECRET)
}

/// Authority settings with [`ADMIN_EMAIL`] as the only admin subject.
pub fn authority_config() -> AuthorityConfig {
    AuthorityConfig::default()
        .with_token(token_config())
        .with_admin_subject(ADMIN_EMAIL)
}

/// Resource settings pointing at `authority_url` with a short timeout.
pub fn resource_config(authority_url: &str) -> ResourceConfig {
    let mut config = ResourceConfig::default()
        .with_authority_url(authority_url)
        .with_cipher_secret(TEST_CIPHER_SECRET);
    config.validation_timeout_ms = 1_000;
    config.request_timeout = Duration::from_secs(5);
    config
}

/// A token authority over [`token_config`].
pub fn token_authority() -> TokenAuthority {
    TokenAuthority::new(token_config()).expect("test token config is valid")
}

/// Identity fixtures.
pub struct IdentityFixtures;

impl IdentityFixtures {
    /// alice, account 1, USER.
    pub fn alice() -> Identity {
        Identity::new("alice@example.com", Role::User, AccountId(1))
    }

    /// bob, account 2, USER.
    pub fn bob() -> Identity {
        Identity::new("bob@example.com", Role::User, AccountId(2))
    }

    /// root, account 3, ADMIN.
    pub fn admin() -> Identity {
        Identity::new(ADMIN_EMAIL, Role::Admin, AccountId(3))
    }

    /// An authenticated context for `identity`.
    pub fn context(identity: &Identity) -> AuthContext {
        AuthContext::authenticated(
            identity.subject.clone(),
            identity.account_id,
            identity.role,
            "test-token",
        )
    }

    /// The positive verdict the authority would return for `identity`.
    pub fn verdict(identity: &Identity) -> TokenValidation {
        TokenValidation {
            valid: true,
            user_id: Some(identity.account_id),
            email: Some(identity.subject.clone()),
            username: identity.subject.split('@').next().map(str::to_string),
            role: Some(identity.role),
            message: "Token is valid".to_string(),
        }
    }
}
