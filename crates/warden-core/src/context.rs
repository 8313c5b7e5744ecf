// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request authentication context.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;
use uuid::Uuid;

use crate::types::{AccountId, Role};

/// Identity derived for a single inbound request.
///
/// Built once by the authentication layer and handed to handlers as an
/// explicit value. It is never cached, pooled or shared between requests.
#[derive(Clone, Serialize)]
pub struct AuthContext {
    /// Subject reported by the authority, or `"anonymous"`.
    pub subject: String,
    /// Account id reported by the authority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    /// Role reported by the authority.
    pub role: Role,
    /// The bearer token the request presented.
    #[serde(skip)]
    pub raw_token: Option<String>,
    /// Whether the authority vouched for the token.
    pub authenticated: bool,
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// Client IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl AuthContext {
    /// Creates an authenticated context from an authority verdict.
    pub fn authenticated(
        subject: impl Into<String>,
        account_id: AccountId,
        role: Role,
        raw_token: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            account_id: Some(account_id),
            role,
            raw_token: Some(raw_token.into()),
            authenticated: true,
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Creates an anonymous context (for unauthenticated requests).
    pub fn anonymous() -> Self {
        Self {
            subject: "anonymous".to_string(),
            account_id: None,
            role: Role::User,
            raw_token: None,
            authenticated: false,
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Sets the client IP.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Returns `true` if the context carries no authenticated identity.
    pub fn is_anonymous(&self) -> bool {
        !self.authenticated
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("subject", &self.subject)
            .field("account_id", &self.account_id)
            .field("role", &self.role)
            .field("raw_token", &self.raw_token.as_ref().map(|_| "[REDACTED]"))
            .field("authenticated", &self.authenticated)
            .field("request_id", &self.request_id)
            .finish()
    }
}
