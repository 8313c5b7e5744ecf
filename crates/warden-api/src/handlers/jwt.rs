// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token verdict handlers for the token authority.
//!
//! Verification failures are answers, not errors: `/validate` always responds
//! 200 with `valid = false` and a reason.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use warden_core::claims::ClaimMap;
use warden_core::protocol::{
    ExpirationStatus, HealthStatus, ResourceAccess, RoleCheck, TokenValidation, ValidateRequest,
};
use warden_core::{AccountId, AuthContext, AuthorizationGuard, Role};

use crate::auth::Account;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::state::AuthorityState;

/// Service name reported by the authority's health check.
pub const AUTHORITY_SERVICE_NAME: &str = "JWT Validation Service";

// =============================================================================
// Verification
// =============================================================================

/// Verifies a token and resolves its account as it is now.
///
/// The error string is the client-facing reason.
async fn current_account(state: &AuthorityState, token: &str) -> Result<Account, String> {
    let claims = state
        .tokens()
        .verify(token)
        .map_err(|e| format!("Token is invalid: {}", e))?;

    match state.accounts.find_by_id(claims.uid).await {
        Some(account) if account.email == claims.sub => Ok(account),
        _ => Err("Account not found".to_string()),
    }
}

/// Builds the context the guard evaluates for an authority-side decision.
fn context_for(account: &Account, token: &str) -> AuthContext {
    AuthContext::authenticated(account.email.clone(), account.id, account.role, token)
}

/// POST /api/jwt/validate
pub async fn validate_token(
    State(state): State<AuthorityState>,
    ValidatedJson(request): ValidatedJson<ValidateRequest>,
) -> Json<TokenValidation> {
    let verdict = match current_account(&state, &request.token).await {
        Ok(account) => {
            tracing::debug!(subject = %account.email, account_id = %account.id, "Token validated");
            TokenValidation {
                valid: true,
                user_id: Some(account.id),
                email: Some(account.email),
                username: Some(account.username),
                role: Some(account.role),
                message: "Token is valid".to_string(),
            }
        }
        Err(reason) => {
            tracing::debug!(reason = %reason, "Token rejected");
            TokenValidation::invalid(reason)
        }
    };
    Json(verdict)
}

// =============================================================================
// Claims and Expiry
// =============================================================================

/// Query carrying a token.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    /// The token.
    pub token: String,
}

/// GET /api/jwt/extract-claims and /api/jwt/get-claims
///
/// Decodes claims without checking the signature. For inspection only.
pub async fn extract_claims(
    State(state): State<AuthorityState>,
    ValidatedQuery(query): ValidatedQuery<TokenQuery>,
) -> ApiResult<Json<ClaimMap>> {
    state
        .tokens()
        .extract_claims_unverified(&query.token)
        .map(Json)
        .map_err(|e| ApiError::bad_request(format!("Failed to extract claims: {}", e)))
}

/// GET /api/jwt/check-expiration
///
/// Reads only the expiry claim. Not a validity check.
pub async fn check_expiration(
    State(state): State<AuthorityState>,
    ValidatedQuery(query): ValidatedQuery<TokenQuery>,
) -> ApiResult<Json<ExpirationStatus>> {
    let expired = state
        .tokens()
        .is_expired(&query.token)
        .map_err(|e| ApiError::bad_request(format!("Failed to check expiration: {}", e)))?;

    Ok(Json(ExpirationStatus {
        expired,
        message: if expired {
            "Token has expired".to_string()
        } else {
            "Token is still valid".to_string()
        },
    }))
}

// =============================================================================
// Access and Role Checks
// =============================================================================

/// Query for a resource access check.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccessQuery {
    /// The token.
    pub token: String,
    /// The account whose resources are requested.
    pub user_id: AccountId,
}

/// GET /api/jwt/verify-user-access
pub async fn verify_user_access(
    State(state): State<AuthorityState>,
    ValidatedQuery(query): ValidatedQuery<UserAccessQuery>,
) -> Response {
    let account = match current_account(&state, &query.token).await {
        Ok(account) => account,
        Err(reason) => {
            tracing::debug!(reason = %reason, "Access check with invalid token");
            let denial = ResourceAccess {
                authorized: false,
                role: None,
                message: "Invalid token".to_string(),
            };
            return (StatusCode::UNAUTHORIZED, Json(denial)).into_response();
        }
    };

    let ctx = context_for(&account, &query.token);
    let authorized = AuthorizationGuard::allows(&ctx, query.user_id);

    tracing::debug!(
        subject = %account.email,
        target = %query.user_id,
        authorized,
        "Resource access checked"
    );

    Json(ResourceAccess {
        authorized,
        role: Some(account.role),
        message: if authorized {
            "User is authorized to access this resource".to_string()
        } else {
            "User is not authorized to access this resource".to_string()
        },
    })
    .into_response()
}

/// Query for a role check.
#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    /// The token.
    pub token: String,
    /// Wire role name, `USER` or `ADMIN`. Matched exactly.
    pub role: String,
}

/// GET /api/jwt/check-role
pub async fn check_role(
    State(state): State<AuthorityState>,
    ValidatedQuery(query): ValidatedQuery<RoleQuery>,
) -> Response {
    let account = match current_account(&state, &query.token).await {
        Ok(account) => account,
        Err(_) => {
            let body = serde_json::json!({ "hasRole": false, "message": "Invalid token" });
            return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        }
    };

    let ctx = context_for(&account, &query.token);
    let has_role = Role::from_wire(&query.role)
        .is_some_and(|role| AuthorizationGuard::has_role(&ctx, role));

    Json(RoleCheck {
        has_role,
        user_role: Some(account.role),
    })
    .into_response()
}

/// GET /api/jwt/health
pub async fn authority_health() -> Json<HealthStatus> {
    Json(HealthStatus::up(AUTHORITY_SERVICE_NAME))
}
