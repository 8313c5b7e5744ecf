// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema.
//!
//! Each section is `#[serde(default)]`, so a file only needs the values it
//! changes. Secrets are never serialized back out.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};

/// Recommended minimum signing secret length in bytes.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime: ten 365-day years.
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 86_400;

// =============================================================================
// WardenConfig
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Token authority settings.
    pub authority: AuthorityConfig,
    /// Resource server settings.
    pub resource: ResourceConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl WardenConfig {
    /// Validates sections shared by both services.
    pub fn validate(&self) -> ConfigResult<()> {
        self.logging.validate()
    }

    /// Validates everything the token authority needs.
    pub fn validate_authority(&self) -> ConfigResult<()> {
        self.validate()?;
        self.authority.validate()
    }

    /// Validates everything the resource server needs.
    pub fn validate_resource(&self) -> ConfigResult<()> {
        self.validate()?;
        self.resource.validate()
    }
}

// =============================================================================
// AuthorityConfig
// =============================================================================

/// Token authority configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Server host address.
    pub host: IpAddr,
    /// Server port.
    pub port: u16,
    /// Token signing settings.
    pub token: TokenConfig,
    /// Subjects that receive the ADMIN role when they register.
    pub admin_subjects: Vec<String>,
    /// Request timeout.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8081,
            token: TokenConfig::default(),
            admin_subjects: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AuthorityConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the token configuration.
    pub fn with_token(mut self, token: TokenConfig) -> Self {
        self.token = token;
        self
    }

    /// Adds a subject that registers as ADMIN.
    pub fn with_admin_subject(mut self, subject: impl Into<String>) -> Self {
        self.admin_subjects.push(subject.into());
        self
    }

    /// Returns `true` if `subject` registers as ADMIN.
    pub fn is_admin_subject(&self, subject: &str) -> bool {
        self.admin_subjects
            .iter()
            .any(|s| s.eq_ignore_ascii_case(subject))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.token.validate()?;
        if self.request_timeout.is_zero() {
            return Err(ConfigError::validation(
                "authority.request_timeout",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Token signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// HMAC signing secret.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Token lifetime in seconds.
    pub ttl_secs: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "warden-authority".to_string(),
            ttl_secs: 86_400,
        }
    }
}

impl TokenConfig {
    /// Creates a configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs() as i64;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.secret.is_empty() {
            return Err(ConfigError::missing_secret("authority.token.secret"));
        }
        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            warn!("Token signing secret is shorter than recommended (32 bytes)");
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::validation(
                "authority.token.issuer",
                "must not be empty",
            ));
        }
        if self.ttl_secs <= 0 {
            return Err(ConfigError::validation(
                "authority.token.ttl_secs",
                "must be greater than zero",
            ));
        }
        if self.ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::validation(
                "authority.token.ttl_secs",
                format!("must not exceed {} (10 years)", MAX_TOKEN_TTL_SECS),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

// =============================================================================
// ResourceConfig
// =============================================================================

/// Resource server configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Server host address.
    pub host: IpAddr,
    /// Server port.
    pub port: u16,
    /// Base URL of the token authority.
    pub authority_url: String,
    /// Upper bound on each validation round trip, in milliseconds.
    pub validation_timeout_ms: u64,
    /// Secret from which the stored-secret cipher key is derived.
    #[serde(skip_serializing)]
    pub cipher_secret: String,
    /// Request timeout.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            authority_url: "http://127.0.0.1:8081".to_string(),
            validation_timeout_ms: 5_000,
            cipher_secret: String::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ResourceConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the validation timeout.
    pub fn validation_timeout(&self) -> Duration {
        Duration::from_millis(self.validation_timeout_ms)
    }

    /// Sets the authority URL.
    pub fn with_authority_url(mut self, url: impl Into<String>) -> Self {
        self.authority_url = url.into();
        self
    }

    /// Sets the cipher secret.
    pub fn with_cipher_secret(mut self, secret: impl Into<String>) -> Self {
        self.cipher_secret = secret.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.cipher_secret.is_empty() {
            return Err(ConfigError::missing_secret("resource.cipher_secret"));
        }
        let url = self.authority_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "resource.authority_url",
                format!("expected an http(s) URL, got '{}'", url),
            ));
        }
        if self.validation_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "resource.validation_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::validation(
                "resource.request_timeout",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ResourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("authority_url", &self.authority_url)
            .field("validation_timeout_ms", &self.validation_timeout_ms)
            .field("cipher_secret", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

// =============================================================================
// LoggingConfig
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter (trace, debug, info, warn, error).
    pub level: String,
    /// Output format (text, json, compact).
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "warning" | "error" => {}
            other => {
                return Err(ConfigError::validation(
                    "logging.level",
                    format!("unknown level '{}'", other),
                ))
            }
        }
        match self.format.to_lowercase().as_str() {
            "text" | "json" | "compact" => Ok(()),
            other => Err(ConfigError::validation(
                "logging.format",
                format!("unknown format '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Duration Serialization
// =============================================================================

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// =============================================================================
// Tests
// =============================================================================
