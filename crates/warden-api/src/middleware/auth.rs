// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication middleware.
//!
//! Fails open: a missing token, a negative verdict or an unreachable
//! authority all leave the request anonymous and let it through. Protected
//! handlers reject anonymous contexts themselves.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request},
    response::Response,
};
use tower::{Layer, Service};
use uuid::Uuid;
use warden_core::AuthContext;

use crate::store::AccountDirectory;
use crate::verifier::TokenVerifier;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer that attaches an [`AuthContext`] to every request.
#[derive(Clone)]
pub struct AuthLayer {
    verifier: Arc<dyn TokenVerifier>,
    directory: Arc<AccountDirectory>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(verifier: Arc<dyn TokenVerifier>, directory: Arc<AccountDirectory>) -> Self {
        Self {
            verifier,
            directory,
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            verifier: self.verifier.clone(),
            directory: self.directory.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware that asks the [`TokenVerifier`] about each bearer token.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    verifier: Arc<dyn TokenVerifier>,
    directory: Arc<AccountDirectory>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let verifier = self.verifier.clone();
        let directory = self.directory.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let request_id = Uuid::now_v7();
            let client_ip = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip());

            let auth_ctx = match extract_bearer_token(&req) {
                Some(token) => authenticate(verifier.as_ref(), &directory, token).await,
                None => AuthContext::anonymous(),
            };

            let mut auth_ctx = auth_ctx.with_request_id(request_id);
            if let Some(ip) = client_ip {
                auth_ctx = auth_ctx.with_client_ip(ip);
            }

            req.extensions_mut().insert(auth_ctx);
            inner.call(req).await
        })
    }
}

/// Turns a verdict into a context. Never fails.
async fn authenticate(
    verifier: &dyn TokenVerifier,
    directory: &AccountDirectory,
    token: String,
) -> AuthContext {
    let verdict = match verifier.validate(&token).await {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::warn!(error = %e, "Could not validate token; continuing unauthenticated");
            return AuthContext::anonymous();
        }
    };

    let (Some(subject), Some(account_id)) = (verdict.subject(), verdict.user_id) else {
        tracing::debug!(reason = %verdict.message, "Token rejected by authority");
        return AuthContext::anonymous();
    };
    let role = verdict.role.unwrap_or_default();

    directory.upsert(account_id, subject, verdict.username.as_deref(), role);
    tracing::debug!(subject = %subject, account_id = %account_id, role = %role, "Request authenticated");

    AuthContext::authenticated(subject, account_id, role, token)
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use std::convert::Infallible;
    use tower::ServiceExt;
    use warden_core::claims::ClaimMap;
    use warden_core::protocol::{ExpirationStatus, ResourceAccess, TokenValidation};
    use warden_core::{AccountId, Role, WardenError};

    /// Accepts "good", rejects "bad", and fails transport for anything else.
    struct StubVerifier;

    #[async_trait]
    impl TokenVerifier for StubVerifier {
        async fn validate(&self, token: &str) -> Result<TokenValidation, WardenError> {
            match token {
                "good" => Ok(TokenValidation {
                    valid: true,
                    user_id: Some(AccountId(1)),
                    email: Some("alice@example.com".into()),
                    username: Some("alice".into()),
                    role: Some(Role::User),
                    message: "Token is valid".into(),
                }),
                "bad" => Ok(TokenValidation::invalid("Token is invalid: expired")),
                _ => Err(WardenError::transport("connection refused")),
            }
        }

        async fn claims(&self, _token: &str) -> Result<ClaimMap, WardenError> {
            Ok(ClaimMap::new())
        }

        async fn expiration(&self, _token: &str) -> Result<ExpirationStatus, WardenError> {
            Err(WardenError::transport("unused"))
        }

        async fn resource_access(
            &self,
            _token: &str,
            _target: AccountId,
        ) -> Result<ResourceAccess, WardenError> {
            Err(WardenError::transport("unused"))
        }
    }

    async fn context_for(header: Option<&'static str>) -> (AuthContext, Arc<AccountDirectory>) {
        let directory = Arc::new(AccountDirectory::new());
        let layer = AuthLayer::new(Arc::new(StubVerifier), directory.clone());
        let service = layer.layer(tower::service_fn(|req: Request<Body>| async move {
            let ctx = req.extensions().get::<AuthContext>().cloned();
            let mut response = Response::new(Body::empty());
            if let Some(ctx) = ctx {
                response.extensions_mut().insert(ctx);
            }
            Ok::<_, Infallible>(response)
        }));

        let mut builder = Request::builder().uri("/api/secrets/user/1");
        if let Some(value) = header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = service
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let ctx = response.extensions().get::<AuthContext>().cloned().unwrap();
        (ctx, directory)
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut req = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer mytoken123"),
        );
        assert_eq!(extract_bearer_token(&req), Some("mytoken123".to_string()));
    }

    #[tokio::test]
    async fn test_valid_token_authenticates() {
        let (ctx, directory) = context_for(Some("Bearer good")).await;
        assert!(ctx.authenticated);
        assert_eq!(ctx.subject, "alice@example.com");
        assert_eq!(ctx.account_id, Some(AccountId(1)));
        assert_eq!(ctx.raw_token.as_deref(), Some("good"));
        assert!(directory.contains(AccountId(1)));
    }

    #[tokio::test]
    async fn test_fails_open() {
        for header in [None, Some("Bearer bad"), Some("Bearer unreachable")] {
            let (ctx, directory) = context_for(header).await;
            assert!(ctx.is_anonymous());
            assert!(directory.list().is_empty());
        }
    }
}
