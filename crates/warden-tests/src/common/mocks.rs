// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Mock implementations for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use warden_api::TokenVerifier;
use warden_core::claims::ClaimMap;
use warden_core::protocol::{ExpirationStatus, ResourceAccess, TokenValidation};
use warden_core::{AccountId, AuthContext, AuthorizationGuard, Identity, WardenError};

use super::fixtures::IdentityFixtures;

/// A scriptable verifier.
///
/// Known tokens verify as their identity; unknown tokens get a negative
/// verdict. [`MockVerifier::set_offline`] turns every call into a transport
/// error.
#[derive(Clone, Default)]
pub struct MockVerifier {
    tokens: Arc<RwLock<HashMap<String, Identity>>>,
    offline: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockVerifier {
    /// Creates a verifier that knows no tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as belonging to `identity`.
    pub fn with_token(self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.write().insert(token.into(), identity);
        self
    }

    /// Simulates an unreachable authority.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, token: &str) -> Result<Option<Identity>, WardenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(WardenError::transport("connection refused"));
        }
        Ok(self.tokens.read().get(token).cloned())
    }
}

#[async_trait]
impl TokenVerifier for MockVerifier {
    async fn validate(&self, token: &str) -> Result<TokenValidation, WardenError> {
        Ok(match self.lookup(token)? {
            Some(identity) => IdentityFixtures::verdict(&identity),
            None => TokenValidation::invalid("Token is invalid: InvalidSignature"),
        })
    }

    async fn claims(&self, token: &str) -> Result<ClaimMap, WardenError> {
        let mut claims = ClaimMap::new();
        if let Some(identity) = self.lookup(token)? {
            claims.insert("sub".into(), identity.subject.into());
            claims.insert("role".into(), identity.role.as_str().into());
            claims.insert("uid".into(), identity.account_id.0.into());
        }
        Ok(claims)
    }

    async fn expiration(&self, token: &str) -> Result<ExpirationStatus, WardenError> {
        let known = self.lookup(token)?.is_some();
        Ok(ExpirationStatus {
            expired: !known,
            message: if known {
                "Token is still valid".into()
            } else {
                "Token has expired".into()
            },
        })
    }

    async fn resource_access(
        &self,
        token: &str,
        target: AccountId,
    ) -> Result<ResourceAccess, WardenError> {
        let Some(identity) = self.lookup(token)? else {
            return Ok(ResourceAccess {
                authorized: false,
                role: None,
                message: "Invalid token".into(),
            });
        };
        let ctx: AuthContext = IdentityFixtures::context(&identity);
        let authorized = AuthorizationGuard::allows(&ctx, target);
        Ok(ResourceAccess {
            authorized,
            role: Some(identity.role),
            message: if authorized {
                "Access granted".into()
            } else {
                "Access denied".into()
            },
        })
    }
}
