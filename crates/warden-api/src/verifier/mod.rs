// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token verification as seen from the resource server.
//!
//! The resource server never holds the signing key. Every verdict comes from
//! a [`TokenVerifier`], which today is always the remote token authority.

mod remote;

use async_trait::async_trait;
use warden_core::claims::ClaimMap;
use warden_core::protocol::{ExpirationStatus, ResourceAccess, TokenValidation};
use warden_core::{AccountId, WardenError};

pub use remote::RemoteValidationClient;

/// Source of token verdicts.
///
/// Implementations report transport problems as
/// [`WardenError::ValidationTransport`]. A negative verdict is not an error.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Full verdict on a token, with the caller's current id and role.
    async fn validate(&self, token: &str) -> Result<TokenValidation, WardenError>;

    /// Raw claims of a token.
    async fn claims(&self, token: &str) -> Result<ClaimMap, WardenError>;

    /// Expiry-only status of a token.
    async fn expiration(&self, token: &str) -> Result<ExpirationStatus, WardenError>;

    /// Whether the token's holder may access `target`'s resources.
    async fn resource_access(
        &self,
        token: &str,
        target: AccountId,
    ) -> Result<ResourceAccess, WardenError>;
}
