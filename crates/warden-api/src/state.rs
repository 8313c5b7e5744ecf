// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared state for the two services.

use std::sync::Arc;

use warden_config::{AuthorityConfig, ResourceConfig};
use warden_core::SecretCipher;

use crate::auth::{AccountStore, InMemoryAccountStore, TokenAuthority};
use crate::error::ApiResult;
use crate::service::{SecretService, UserService};
use crate::store::{AccountDirectory, InMemorySecretStore, SecretStore};
use crate::verifier::TokenVerifier;

// =============================================================================
// AuthorityState
// =============================================================================

/// State of the token authority.
///
/// The signing key lives only here, inside [`TokenAuthority`].
#[derive(Clone)]
pub struct AuthorityState {
    /// Authority configuration.
    pub config: Arc<AuthorityConfig>,
    /// Token issuer/verifier.
    pub tokens: Arc<TokenAuthority>,
    /// Registered accounts.
    pub accounts: Arc<dyn AccountStore>,
}

impl AuthorityState {
    /// Creates state with an empty in-memory account store.
    pub fn new(config: AuthorityConfig) -> ApiResult<Self> {
        Self::with_accounts(config, Arc::new(InMemoryAccountStore::new()))
    }

    /// Creates state over an existing account store.
    pub fn with_accounts(
        config: AuthorityConfig,
        accounts: Arc<dyn AccountStore>,
    ) -> ApiResult<Self> {
        let tokens = TokenAuthority::new(config.token.clone())?;
        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            accounts,
        })
    }

    /// Returns the token authority.
    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }
}

// =============================================================================
// ResourceState
// =============================================================================

/// State of the resource server.
///
/// Holds no signing key. Token verdicts come from `verifier`.
#[derive(Clone)]
pub struct ResourceState {
    /// Resource server configuration.
    pub config: Arc<ResourceConfig>,
    /// Source of token verdicts.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Accounts seen by this server.
    pub directory: Arc<AccountDirectory>,
    /// Guarded secret operations.
    pub secrets: SecretService,
    /// Guarded profile operations.
    pub users: UserService,
}

impl ResourceState {
    /// Creates state with an empty in-memory secret store.
    pub fn new(config: ResourceConfig, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self::with_store(config, verifier, Arc::new(InMemorySecretStore::new()))
    }

    /// Creates state over an existing secret store.
    pub fn with_store(
        config: ResourceConfig,
        verifier: Arc<dyn TokenVerifier>,
        store: Arc<dyn SecretStore>,
    ) -> Self {
        let cipher = Arc::new(SecretCipher::new(&config.cipher_secret));
        let directory = Arc::new(AccountDirectory::new());

        Self {
            secrets: SecretService::new(store.clone(), cipher, directory.clone()),
            users: UserService::new(directory.clone(), store),
            config: Arc::new(config),
            verifier,
            directory,
        }
    }
}
