// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Wire types exchanged between the resource server and the token authority.
//!
//! Field names follow the authority's JSON surface (`camelCase`).

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Role};

// =============================================================================
// Paths
// =============================================================================

/// Endpoint paths exposed by the token authority.
pub mod paths {
    /// Register a new account.
    pub const REGISTER: &str = "/api/auth/register";
    /// Log in with email and password.
    pub const LOGIN: &str = "/api/auth/login";
    /// Check a password without issuing a token.
    pub const VERIFY_PASSWORD: &str = "/api/auth/verify-password";
    /// Full token verdict.
    pub const VALIDATE: &str = "/api/jwt/validate";
    /// Unverified claim extraction.
    pub const EXTRACT_CLAIMS: &str = "/api/jwt/extract-claims";
    /// Alias of [`EXTRACT_CLAIMS`].
    pub const GET_CLAIMS: &str = "/api/jwt/get-claims";
    /// Expiry-only check.
    pub const CHECK_EXPIRATION: &str = "/api/jwt/check-expiration";
    /// Role/ownership check against a target account.
    pub const VERIFY_USER_ACCESS: &str = "/api/jwt/verify-user-access";
    /// Exact role check.
    pub const CHECK_ROLE: &str = "/api/jwt/check-role";
    /// Liveness.
    pub const HEALTH: &str = "/api/jwt/health";
}

// =============================================================================
// Validation
// =============================================================================

/// Body of a validation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// The token to validate.
    pub token: String,
}

/// The authority's verdict on a token.
///
/// Always delivered with HTTP 200; failures set `valid = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    /// Whether the token verified and its account exists.
    pub valid: bool,
    /// Current account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<AccountId>,
    /// Token subject (account email).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Current account role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Human-readable outcome.
    pub message: String,
}

impl TokenValidation {
    /// Creates a negative verdict.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            user_id: None,
            email: None,
            username: None,
            role: None,
            message: message.into(),
        }
    }

    /// Returns the subject if the verdict is positive and complete.
    pub fn subject(&self) -> Option<&str> {
        if self.valid {
            self.email.as_deref().filter(|s| !s.is_empty())
        } else {
            None
        }
    }
}

/// Expiry-only check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationStatus {
    /// Whether the expiry claim has passed.
    pub expired: bool,
    /// Human-readable outcome.
    pub message: String,
}

/// Role/ownership check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAccess {
    /// Whether access is granted.
    pub authorized: bool,
    /// The caller's current role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Human-readable outcome.
    pub message: String,
}

/// Exact role check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCheck {
    /// Whether the caller holds the requested role.
    pub has_role: bool,
    /// The caller's current role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<Role>,
}

// =============================================================================
// Accounts
// =============================================================================

/// Returned by registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Account id.
    pub id: AccountId,
    /// Display name.
    pub username: String,
    /// Account email (token subject).
    pub email: String,
    /// Signed token.
    pub token: String,
    /// Account role.
    pub role: Role,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Password check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCheck {
    /// Whether the password matched.
    pub valid: bool,
    /// Account id, when the password matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<AccountId>,
    /// Human-readable outcome.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Overall status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Version string.
    pub version: String,
}

impl HealthStatus {
    /// Creates an "UP" status for the named service.
    pub fn up(service: impl Into<String>) -> Self {
        Self {
            status: "UP".to_string(),
            service: service.into(),
            version: crate::VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_wire_names() {
        let verdict = TokenValidation {
            valid: true,
            user_id: Some(AccountId(1)),
            email: Some("alice@example.com".into()),
            username: Some("alice".into()),
            role: Some(Role::User),
            message: "Token is valid".into(),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["role"], "USER");
        assert_eq!(verdict.subject(), Some("alice@example.com"));
    }

    #[test]
    fn test_invalid_verdict_has_no_subject() {
        let verdict: TokenValidation =
            serde_json::from_str(r#"{"valid":false,"message":"Token is invalid"}"#).unwrap();
        assert!(!verdict.valid);
        assert_eq!(verdict.subject(), None);

        let mut odd = verdict.clone();
        odd.email = Some("x@example.com".into());
        assert_eq!(odd.subject(), None);
    }

    #[test]
    fn test_role_check_wire_names() {
        let check = RoleCheck {
            has_role: true,
            user_role: Some(Role::Admin),
        };
        let json = serde_json::to_value(check).unwrap();
        assert_eq!(json["hasRole"], true);
        assert_eq!(json["userRole"], "ADMIN");
    }
}
