// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account handlers for the token authority.

use axum::{extract::State, Json};
use serde::Deserialize;
use warden_core::protocol::{AuthResponse, PasswordCheck};
use warden_core::Role;

use crate::auth::{self, Account, NewAccount};
use crate::error::{ApiError, ApiResult};
use crate::extractors::ValidatedJson;
use crate::state::AuthorityState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// =============================================================================
// Register
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Email, used as the token subject.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register
///
/// Creates an account and returns a token for it.
pub async fn register(
    State(state): State<AuthorityState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let username = request.username.trim();
    let email = request.email.trim();

    if username.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request(
            "Username, email and password are required",
        ));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("Email address is not valid"));
    }

    let role = if state.config.is_admin_subject(email) {
        Role::Admin
    } else {
        Role::User
    };

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("Hashing task failed: {}", e)))??;

    let account = state
        .accounts
        .insert(NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
        })
        .await?;

    let accounts = state.accounts.count().await;
    tracing::info!(
        subject = %account.email,
        account_id = %account.id,
        role = %account.role,
        accounts,
        "Account registered"
    );

    issue_response(&state, &account).map(Json)
}

// =============================================================================
// Login
// =============================================================================

/// Credentials body shared by login and password checks.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/login
///
/// Authenticates an account and returns a token.
pub async fn login(
    State(state): State<AuthorityState>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let Some(account) = check_credentials(&state, request).await? else {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    tracing::info!(subject = %account.email, account_id = %account.id, "Account logged in");

    issue_response(&state, &account).map(Json)
}

/// POST /api/auth/verify-password
///
/// Checks credentials without issuing a token.
pub async fn verify_password(
    State(state): State<AuthorityState>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> ApiResult<Json<PasswordCheck>> {
    let check = match check_credentials(&state, request).await? {
        Some(account) => PasswordCheck {
            valid: true,
            user_id: Some(account.id),
            message: "Password is valid".to_string(),
        },
        None => PasswordCheck {
            valid: false,
            user_id: None,
            message: INVALID_CREDENTIALS.to_string(),
        },
    };
    Ok(Json(check))
}

/// Returns the account if the credentials match. Unknown email and wrong
/// password are indistinguishable to the caller, in body and in latency.
async fn check_credentials(
    state: &AuthorityState,
    request: CredentialsRequest,
) -> ApiResult<Option<Account>> {
    let account = state.accounts.find_by_email(&request.email).await;
    let hash = account
        .as_ref()
        .map_or(auth::UNKNOWN_ACCOUNT_HASH, |a| a.password_hash.as_str())
        .to_string();

    let password = request.password;
    let matches = tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("Verification task failed: {}", e)))?;

    match account {
        Some(account) if matches => Ok(Some(account)),
        Some(account) => {
            tracing::debug!(subject = %account.email, "Password mismatch");
            Ok(None)
        }
        None => {
            tracing::debug!("Credential check for unknown email");
            Ok(None)
        }
    }
}

fn issue_response(state: &AuthorityState, account: &Account) -> ApiResult<AuthResponse> {
    let token = state.tokens().issue(&account.identity())?;
    Ok(AuthResponse {
        id: account.id,
        username: account.username.clone(),
        email: account.email.clone(),
        token,
        role: account.role,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens().ttl_secs(),
    })
}
