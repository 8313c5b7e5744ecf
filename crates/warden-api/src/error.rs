// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! [`ApiError`] maps to an HTTP status and a JSON body. Infrastructure
//! failures (transport, crypto) collapse to a generic message so clients
//! never see internal detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_core::{TokenError, WardenError};

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// An error as the HTTP caller sees it.
///
/// The `Display` text is for logs. Clients get [`ApiError::user_message`].
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// Missing, invalid or expired credentials.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Authenticated, but the guard said no.
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The token authority could not be reached.
    #[error("upstream unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("internal: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// 404 for `resource`.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 400.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// 401.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// 403. `message` is logged, never returned.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// 409.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// 503. `message` is logged, never returned.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// 500. `message` is logged, never returned.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            Self::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    /// Stable machine-readable code, e.g. `FORBIDDEN`.
    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }

    /// The message clients receive.
    ///
    /// Denials and infrastructure failures get fixed text so neither the
    /// guard's reasoning nor upstream addresses leak.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource } => format!("{} not found", resource),
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Conflict { message } => message.clone(),
            Self::Forbidden { .. } => "Access denied".to_string(),
            Self::ServiceUnavailable { .. } => "Service temporarily unavailable".to_string(),
            Self::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// True for 5xx errors.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, %status, "request failed");
        } else {
            tracing::debug!(error = %self, code, %status, "request rejected");
        }

        let body = ErrorResponseBody {
            error: ErrorDetails {
                code: code.to_string(),
                message: self.user_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    #[allow(missing_docs)]
    pub error: ErrorDetails,
}

/// Inner object of [`ErrorResponseBody`].
#[allow(missing_docs)]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

// =============================================================================
// Conversions
// =============================================================================

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::unauthorized(err.to_string())
    }
}

impl From<WardenError> for ApiError {
    fn from(err: WardenError) -> Self {
        match err {
            WardenError::Token(e) => e.into(),
            WardenError::Unauthenticated => ApiError::unauthorized("Authentication required"),
            WardenError::AuthorizationDenied { subject, target } => {
                ApiError::forbidden(format!("{} may not access account {}", subject, target))
            }
            WardenError::AccountNotFound { account_id } => {
                ApiError::not_found(format!("Account {}", account_id))
            }
            WardenError::SecretNotFound { secret_id } => {
                ApiError::not_found(format!("Secret {}", secret_id))
            }
            WardenError::InvalidInput { message } => ApiError::bad_request(message),
            WardenError::ValidationTransport { message } => ApiError::service_unavailable(message),
            WardenError::Decryption(e) if e.is_decryption_failure() => {
                ApiError::internal(format!("Stored secret is unreadable: {}", e))
            }
            WardenError::Decryption(e) => ApiError::service_unavailable(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("JSON error: {}", err))
    }
}

// =============================================================================
// Tests
// =============================================================================
