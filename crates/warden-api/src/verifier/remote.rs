// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP client for the token authority.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use warden_config::ResourceConfig;
use warden_core::claims::ClaimMap;
use warden_core::protocol::{
    paths, ExpirationStatus, ResourceAccess, TokenValidation, ValidateRequest,
};
use warden_core::{AccountId, WardenError};

use super::TokenVerifier;

/// Asks the token authority for verdicts over HTTP.
///
/// One round trip per call. No retries and no caching.
///
/// The `check_*` and `fetch_claims` helpers fail closed: a transport failure
/// reads as "invalid", "no claims", "expired" or "denied". The
/// [`TokenVerifier`] methods surface the failure instead, so the
/// authentication middleware can choose to continue unauthenticated.
#[derive(Debug, Clone)]
pub struct RemoteValidationClient {
    base_url: String,
    http_client: Client,
}

impl RemoteValidationClient {
    /// Creates a client for the authority at `base_url`, bounding every call
    /// by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WardenError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| WardenError::transport(format!("creating HTTP client: {}", e)))?;

        debug!(base_url = %base_url, timeout_ms = timeout.as_millis() as u64, "Validation client initialized");

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Creates a client from resource server configuration.
    pub fn from_config(config: &ResourceConfig) -> Result<Self, WardenError> {
        Self::new(&config.authority_url, config.validation_timeout())
    }

    /// Returns the authority base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Fail-closed helpers
    // =========================================================================

    /// Returns `true` only if the authority positively validated the token.
    pub async fn check_valid(&self, token: &str) -> bool {
        match self.validate(token).await {
            Ok(verdict) => {
                debug!(valid = verdict.valid, "Token validation result");
                verdict.valid
            }
            Err(e) => {
                warn!(error = %e, "Error validating token");
                false
            }
        }
    }

    /// Returns the token's claims, or an empty map on any failure.
    pub async fn fetch_claims(&self, token: &str) -> ClaimMap {
        match self.claims(token).await {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "Error retrieving claims");
                ClaimMap::new()
            }
        }
    }

    /// Returns `true` unless the authority confirmed the token is unexpired.
    pub async fn check_expired(&self, token: &str) -> bool {
        match self.expiration(token).await {
            Ok(status) => status.expired,
            Err(e) => {
                warn!(error = %e, "Error checking token expiration");
                true
            }
        }
    }

    /// Returns `true` only if the authority granted access to `target`.
    pub async fn check_resource_access(&self, token: &str, target: AccountId) -> bool {
        match self.resource_access(token, target).await {
            Ok(access) => access.authorized,
            Err(e) => {
                warn!(error = %e, target = %target, "Error checking resource access");
                false
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, WardenError> {
        self.http_client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(path, e))
    }
}

#[async_trait]
impl TokenVerifier for RemoteValidationClient {
    async fn validate(&self, token: &str) -> Result<TokenValidation, WardenError> {
        let response = self
            .http_client
            .post(self.url(paths::VALIDATE))
            .json(&ValidateRequest {
                token: token.to_string(),
            })
            .send()
            .await
            .map_err(|e| transport_error(paths::VALIDATE, e))?;

        read_body(paths::VALIDATE, response, &[StatusCode::OK]).await
    }

    async fn claims(&self, token: &str) -> Result<ClaimMap, WardenError> {
        let response = self.get(paths::GET_CLAIMS, &[("token", token)]).await?;
        read_body(paths::GET_CLAIMS, response, &[StatusCode::OK]).await
    }

    async fn expiration(&self, token: &str) -> Result<ExpirationStatus, WardenError> {
        let response = self.get(paths::CHECK_EXPIRATION, &[("token", token)]).await?;
        read_body(paths::CHECK_EXPIRATION, response, &[StatusCode::OK]).await
    }

    async fn resource_access(
        &self,
        token: &str,
        target: AccountId,
    ) -> Result<ResourceAccess, WardenError> {
        let user_id = target.to_string();
        let response = self
            .get(
                paths::VERIFY_USER_ACCESS,
                &[("token", token), ("userId", user_id.as_str())],
            )
            .await?;

        // 401 carries a negative verdict, not a transport failure.
        read_body(
            paths::VERIFY_USER_ACCESS,
            response,
            &[StatusCode::OK, StatusCode::UNAUTHORIZED],
        )
        .await
    }
}

fn transport_error(path: &str, e: reqwest::Error) -> WardenError {
    if e.is_timeout() {
        WardenError::transport(format!("{}: timed out", path))
    } else {
        WardenError::transport(format!("{}: {}", path, e))
    }
}

async fn read_body<T: DeserializeOwned>(
    path: &str,
    response: Response,
    accepted: &[StatusCode],
) -> Result<T, WardenError> {
    let status = response.status();
    if !accepted.contains(&status) {
        return Err(WardenError::transport(format!(
            "{}: unexpected status {}",
            path, status
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| WardenError::transport(format!("{}: unreadable body: {}", path, e)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use warden_core::Role;

    fn client(server: &mockito::Server) -> RemoteValidationClient {
        RemoteValidationClient::new(server.url(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_validate_positive() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", paths::VALIDATE)
            .match_body(Matcher::Json(serde_json::json!({"token": "t1"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"valid":true,"userId":1,"email":"alice@example.com","username":"alice","role":"USER","message":"Token is valid"}"#,
            )
            .expect(2)
            .create_async()
            .await;

        let client = client(&server);
        let verdict = client.validate("t1").await.unwrap();
        assert!(verdict.valid);
        assert_eq!(verdict.user_id, Some(AccountId(1)));
        assert_eq!(verdict.role, Some(Role::User));
        assert!(client.check_valid("t1").await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_negative_verdict_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", paths::VALIDATE)
            .with_status(200)
            .with_body(r#"{"valid":false,"message":"Token is invalid: expired"}"#)
            .create_async()
            .await;

        let verdict = client(&server).validate("t").await.unwrap();
        assert!(!verdict.valid);
        assert!(verdict.subject().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", paths::VALIDATE)
            .with_status(500)
            .create_async()
            .await;

        let client = client(&server);
        assert!(matches!(
            client.validate("t").await,
            Err(WardenError::ValidationTransport { .. })
        ));
        assert!(!client.check_valid("t").await);
    }

    #[tokio::test]
    async fn test_garbage_body_is_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", paths::VALIDATE)
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        assert!(client(&server).validate("t").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_claims() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", paths::GET_CLAIMS)
            .match_query(Matcher::UrlEncoded("token".into(), "t".into()))
            .with_status(200)
            .with_body(r#"{"sub":"alice@example.com","role":"USER","uid":1}"#)
            .create_async()
            .await;
        server
            .mock("GET", paths::GET_CLAIMS)
            .match_query(Matcher::UrlEncoded("token".into(), "bad".into()))
            .with_status(400)
            .with_body(r#"{"error":"Failed to extract claims"}"#)
            .create_async()
            .await;

        let client = client(&server);
        let claims = client.fetch_claims("t").await;
        assert_eq!(claims["sub"], "alice@example.com");
        assert!(client.fetch_claims("bad").await.is_empty());
    }

    #[tokio::test]
    async fn test_resource_access_401_is_denial() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", paths::VERIFY_USER_ACCESS)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("token".into(), "t".into()),
                Matcher::UrlEncoded("userId".into(), "2".into()),
            ]))
            .with_status(401)
            .with_body(r#"{"authorized":false,"message":"Invalid token"}"#)
            .create_async()
            .await;

        let client = client(&server);
        let access = client.resource_access("t", AccountId(2)).await.unwrap();
        assert!(!access.authorized);
        assert!(!client.check_resource_access("t", AccountId(2)).await);
    }

    #[tokio::test]
    async fn test_check_expired() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", paths::CHECK_EXPIRATION)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"expired":false,"message":"Token is still valid"}"#)
            .create_async()
            .await;

        assert!(!client(&server).check_expired("t").await);
    }

    #[tokio::test]
    async fn test_unreachable_authority_fails_closed() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client =
            RemoteValidationClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        assert!(!client.check_valid("t").await);
        assert!(client.fetch_claims("t").await.is_empty());
        assert!(client.check_expired("t").await);
        assert!(!client.check_resource_access("t", AccountId(1)).await);
        assert!(matches!(
            client.validate("t").await,
            Err(WardenError::ValidationTransport { .. })
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client =
            RemoteValidationClient::new("http://auth.local:8081/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://auth.local:8081");
    }
}
