// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP servers for the token authority and the resource server.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use warden_core::protocol::paths;

use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::AuthLayer;
use crate::state::{AuthorityState, ResourceState};

// =============================================================================
// AuthorityServer
// =============================================================================

/// The token authority HTTP server.
pub struct AuthorityServer {
    state: AuthorityState,
}

impl AuthorityServer {
    /// Creates a server over the given state.
    pub fn new(state: AuthorityState) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.state.config.request_timeout,
            ))
            .layer(cors_layer());

        Router::new()
            .route(paths::REGISTER, post(handlers::register))
            .route(paths::LOGIN, post(handlers::login))
            .route(paths::VERIFY_PASSWORD, post(handlers::verify_password))
            .route(paths::VALIDATE, post(handlers::validate_token))
            .route(paths::EXTRACT_CLAIMS, get(handlers::extract_claims))
            .route(paths::GET_CLAIMS, get(handlers::extract_claims))
            .route(paths::CHECK_EXPIRATION, get(handlers::check_expiration))
            .route(paths::VERIFY_USER_ACCESS, get(handlers::verify_user_access))
            .route(paths::CHECK_ROLE, get(handlers::check_role))
            .route(paths::HEALTH, get(handlers::authority_health))
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Returns the configured address.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.socket_addr()
    }

    /// Binds the configured address and runs until `shutdown_signal` resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let listener = bind(self.addr()).await?;
        self.serve(listener, shutdown_signal).await
    }

    /// Runs on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        info!(addr = ?listener.local_addr().ok(), issuer = %self.state.tokens().issuer(), "Starting token authority");
        serve(listener, self.router(), shutdown_signal).await?;
        info!("Token authority shutdown complete");
        Ok(())
    }
}

// =============================================================================
// ResourceServer
// =============================================================================

/// The resource server.
///
/// Every request passes through the fail-open [`AuthLayer`].
pub struct ResourceServer {
    state: ResourceState,
}

impl ResourceServer {
    /// Creates a server over the given state.
    pub fn new(state: ResourceState) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let auth = AuthLayer::new(self.state.verifier.clone(), self.state.directory.clone());

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.state.config.request_timeout,
            ))
            .layer(cors_layer())
            .layer(auth);

        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api/secrets/user/{userId}",
                get(handlers::list_secrets).post(handlers::create_secret),
            )
            .route(
                "/api/secrets/user/{userId}/{secretId}",
                get(handlers::get_secret)
                    .put(handlers::update_secret)
                    .delete(handlers::delete_secret),
            )
            .route("/api/users", get(handlers::list_users))
            .route("/api/users/me", get(handlers::current_user))
            .route(
                "/api/users/{id}",
                get(handlers::get_user)
                    .put(handlers::update_user)
                    .delete(handlers::delete_user),
            )
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Returns the configured address.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.socket_addr()
    }

    /// Binds the configured address and runs until `shutdown_signal` resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let listener = bind(self.addr()).await?;
        self.serve(listener, shutdown_signal).await
    }

    /// Runs on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        info!(
            addr = ?listener.local_addr().ok(),
            authority = %self.state.config.authority_url,
            "Starting resource server"
        );
        serve(listener, self.router(), shutdown_signal).await?;
        info!("Resource server shutdown complete");
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

async fn bind(addr: SocketAddr) -> ApiResult<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))
}

async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> ApiResult<()> {
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
    .map_err(|e| ApiError::internal(format!("Server error: {}", e)))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use warden_config::{AuthorityConfig, ResourceConfig, TokenConfig};

    use crate::verifier::RemoteValidationClient;

    fn authority() -> AuthorityServer {
        let config = AuthorityConfig::default()
            .with_token(TokenConfig::new("test-secret-key-that-is-long-enough-for-testing"));
        AuthorityServer::new(AuthorityState::new(config).unwrap())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_authority_health() {
        let response = authority()
            .router()
            .oneshot(Request::get(paths::HEALTH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "UP");
        assert_eq!(body["service"], "JWT Validation Service");
    }

    #[tokio::test]
    async fn test_validate_garbage_is_200_invalid() {
        let response = authority()
            .router()
            .oneshot(
                Request::post(paths::VALIDATE)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"token":"garbage"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["valid"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Token is invalid"));
    }

    #[tokio::test]
    async fn test_extract_claims_missing_token_is_400() {
        let response = authority()
            .router()
            .oneshot(Request::get(paths::EXTRACT_CLAIMS).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_resource_health_is_public() {
        let config = ResourceConfig::default().with_cipher_secret("k1");
        let verifier = RemoteValidationClient::new("http://127.0.0.1:9", Duration::from_millis(200))
            .unwrap();
        let server = ResourceServer::new(ResourceState::new(config, Arc::new(verifier)));

        let response = server
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_resource_route_without_token_is_401() {
        let config = ResourceConfig::default().with_cipher_secret("k1");
        let verifier = RemoteValidationClient::new("http://127.0.0.1:9", Duration::from_millis(200))
            .unwrap();
        let server = ResourceServer::new(ResourceState::new(config, Arc::new(verifier)));

        let response = server
            .router()
            .oneshot(
                Request::get("/api/secrets/user/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
