// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AccountId, Identity, Role};

/// A raw, decoded claim map.
///
/// Key order is irrelevant; values are JSON primitives or lists.
pub type ClaimMap = serde_json::Map<String, serde_json::Value>;

/// Claims embedded in every token the authority issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    // =========================================================================
    // Registered Claims
    // =========================================================================
    /// Subject (account email).
    pub sub: String,

    /// Issuer.
    pub iss: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Token ID.
    pub jti: String,

    // =========================================================================
    // Private Claims
    // =========================================================================
    /// Role at issuance time.
    pub role: Role,

    /// Account id at issuance time.
    pub uid: AccountId,
}

impl Claims {
    /// Creates claims for an identity, valid from `issued_at` for `ttl`.
    ///
    /// `None` if the expiry falls outside the representable time range.
    pub fn new(
        identity: &Identity,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;
        Some(Self {
            sub: identity.subject.clone(),
            iss: issuer.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::now_v7().to_string(),
            role: identity.role,
            uid: identity.account_id,
        })
    }

    /// Returns the identity carried by these claims.
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone(), self.role, self.uid)
    }

    /// Returns `true` if the claims have expired at `now`.
    ///
    /// A token is usable strictly before its expiration second.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired_at(self.exp, now)
    }
}

/// Returns `true` if an `exp` timestamp has passed at `now`.
pub fn is_expired_at(exp: i64, now: DateTime<Utc>) -> bool {
    now.timestamp() >= exp
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity::new("alice@example.com", Role::User, AccountId(1))
    }

    #[test]
    fn test_new_claims() {
        let now = Utc::now();
        let claims = Claims::new(&alice(), "warden-authority", now, Duration::hours(24)).unwrap();

        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.iss, "warden-authority");
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert_eq!(claims.identity(), alice());
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expiry_boundary() {
        let start = Utc::now();
        let claims = Claims::new(&alice(), "iss", start, Duration::seconds(60)).unwrap();

        assert!(!claims.is_expired_at(start));
        assert!(!claims.is_expired_at(start + Duration::seconds(59)));
        assert!(claims.is_expired_at(start + Duration::seconds(60)));
        assert!(claims.is_expired_at(start + Duration::days(2)));
    }

    #[test]
    fn test_unrepresentable_expiry() {
        assert!(Claims::new(&alice(), "iss", Utc::now(), Duration::MAX).is_none());
        assert!(Claims::new(&alice(), "iss", DateTime::<Utc>::MAX_UTC, Duration::seconds(1)).is_none());
    }
}
