// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request extractors that surface the per-request [`AuthContext`].

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use warden_core::{AccountId, AuthContext};

use crate::error::ApiError;

// =============================================================================
// Auth Extractors
// =============================================================================

/// Extractor for authenticated requests.
///
/// Returns 401 when the authentication layer left the request anonymous.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(ctx): Auth) -> impl IntoResponse {
///     format!("Hello, {}", ctx.subject)
/// }
/// ```
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .filter(|ctx| !ctx.is_anonymous())
            .map(Auth)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Extractor that never rejects.
///
/// Yields the anonymous context when nothing authenticated the request.
pub struct MaybeAuth(pub AuthContext);

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_default();
        Ok(MaybeAuth(ctx))
    }
}

// =============================================================================
// Body and Query Extractors
// =============================================================================

/// JSON body extractor whose rejection uses the API error format.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Query string extractor whose rejection uses the API error format.
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid query: {}", e)))?;

        Ok(ValidatedQuery(value))
    }
}

// =============================================================================
// Path Extractors
// =============================================================================

/// Account id from a single-segment path.
pub struct AccountPath(pub AccountId);

impl<S> FromRequestParts<S> for AccountPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<u64>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid account id: {}", e)))?;

        Ok(AccountPath(AccountId(id)))
    }
}

/// Owner account id and secret id from a two-segment path.
pub struct SecretPath(pub AccountId, pub u64);

impl<S> FromRequestParts<S> for SecretPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((owner, secret_id)) = Path::<(u64, u64)>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid path: {}", e)))?;

        Ok(SecretPath(AccountId(owner), secret_id))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use warden_core::Role;

    async fn parts_with(ctx: Option<AuthContext>) -> Parts {
        let (mut parts, _) = Request::builder()
            .uri("/api/users/me")
            .body(())
            .unwrap()
            .into_parts();
        if let Some(ctx) = ctx {
            parts.extensions.insert(ctx);
        }
        parts
    }

    #[tokio::test]
    async fn test_auth_rejects_anonymous() {
        let mut parts = parts_with(Some(AuthContext::anonymous())).await;
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));

        let mut parts = parts_with(None).await;
        assert!(Auth::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_auth_accepts_authenticated() {
        let ctx = AuthContext::authenticated("alice@example.com", AccountId(1), Role::User, "t");
        let mut parts = parts_with(Some(ctx)).await;
        let Auth(ctx) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.subject, "alice@example.com");
    }

    #[tokio::test]
    async fn test_maybe_auth_never_rejects() {
        let mut parts = parts_with(None).await;
        let MaybeAuth(ctx) = MaybeAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(ctx.is_anonymous());
    }
}
