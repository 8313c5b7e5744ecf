// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Test harnesses.
//!
//! [`AuthorityHarness`] runs a real token authority on an ephemeral port.
//! [`ResourceApp`] drives a resource server router in-process.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use warden_api::{
    AuthorityServer, AuthorityState, ResourceServer, ResourceState, TokenVerifier,
};
use warden_config::AuthorityConfig;
use warden_core::protocol::{paths, AuthResponse};

use super::fixtures::{authority_config, resource_config, UNREACHABLE_AUTHORITY};

// =============================================================================
// AuthorityHarness
// =============================================================================

/// A token authority listening on `127.0.0.1:<ephemeral>`.
///
/// Shuts the server down when dropped.
pub struct AuthorityHarness {
    addr: SocketAddr,
    state: AuthorityState,
    http: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AuthorityHarness {
    /// Starts an authority with [`authority_config`].
    pub async fn start() -> Self {
        Self::start_with(authority_config()).await
    }

    /// Starts an authority with `config`. The configured port is ignored.
    pub async fn start_with(config: AuthorityConfig) -> Self {
        let state = AuthorityState::new(config).expect("authority state");
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let (tx, rx) = oneshot::channel::<()>();
        let server = AuthorityServer::new(state.clone());
        let task = tokio::spawn(async move {
            let signal = async {
                let _ = rx.await;
            };
            if let Err(e) = server.serve(listener, signal).await {
                tracing::error!(error = %e, "Test authority failed");
            }
        });

        Self {
            addr,
            state,
            http: reqwest::Client::new(),
            shutdown: Some(tx),
            task: Some(task),
        }
    }

    /// Base URL of the running authority.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shared state, for issuing tokens directly.
    pub fn state(&self) -> &AuthorityState {
        &self.state
    }

    /// Registers an account over HTTP and returns the response.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AuthResponse {
        let response = self
            .http
            .post(format!("{}{}", self.base_url(), paths::REGISTER))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("register request");
        assert!(
            response.status().is_success(),
            "register failed: {}",
            response.status()
        );
        response.json().await.expect("register body")
    }

    /// Logs in over HTTP and returns the status and raw body.
    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        let response = self
            .http
            .post(format!("{}{}", self.base_url(), paths::LOGIN))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request");
        let status = StatusCode::from_u16(response.status().as_u16()).expect("status");
        (status, response.json().await.unwrap_or(Value::Null))
    }

    /// GETs `path` with `query`, URL-encoded, and returns the status and raw body.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> (StatusCode, Value) {
        let response = self
            .http
            .get(format!("{}{}", self.base_url(), path))
            .query(query)
            .send()
            .await
            .expect("authority request");
        let status = StatusCode::from_u16(response.status().as_u16()).expect("status");
        (status, response.json().await.unwrap_or(Value::Null))
    }

    /// Stops the server and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for AuthorityHarness {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

// =============================================================================
// ResourceApp
// =============================================================================

/// A resource server router driven with `oneshot`.
pub struct ResourceApp {
    /// Server state, for direct inspection.
    pub state: ResourceState,
    router: Router,
}

impl ResourceApp {
    /// Builds a resource server over `verifier`.
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        let state = ResourceState::new(resource_config(UNREACHABLE_AUTHORITY), verifier);
        let router = ResourceServer::new(state.clone()).router();
        Self { state, router }
    }

    /// Sends a request and returns the status and JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    /// GET shorthand.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }
}
