// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw text
//! 3. Parse into [`WardenConfig`]
//! 4. Apply `WARDEN_*` environment overrides
//! 5. Validate shared sections
//!
//! # Environment Variable Override
//!
//! ```text
//! WARDEN_TOKEN_SECRET=...
//! WARDEN_TOKEN_TTL_SECS=3600
//! WARDEN_AUTHORITY_PORT=9081
//! WARDEN_CIPHER_SECRET=...
//! WARDEN_AUTHORITY_URL=http://authority:8081
//! WARDEN_RESOURCE_PORT=9080
//! WARDEN_VALIDATION_TIMEOUT_MS=2000
//! WARDEN_LOG_LEVEL=debug
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::WardenConfig;

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use warden_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("warden.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            env_prefix: "WARDEN".to_string(),
            resolve_env_vars: true,
        }
    }
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable handling.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<WardenConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let format = ConfigFormat::from_path(path)?;

        let config = self
            .load_from_str(&content, format)
            .map_err(|e| match e {
                ConfigError::Serialization { message } => ConfigError::parse(path, message),
                other => other,
            })?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<WardenConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        let mut config: WardenConfig = parse_str(&content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;
        debug!(
            authority = %config.authority.socket_addr(),
            resource = %config.resource.socket_addr(),
            authority_url = %config.resource.authority_url,
            "Configuration parsed"
        );
        Ok(config)
    }

    /// Resolves `${VAR}` and `${VAR:default}` placeholders.
    ///
    /// Unknown variables without a default are left in place.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                result.push_str(&rest[start..]);
                return result;
            };

            let placeholder = &after[..end];
            let (name, default) = match placeholder.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (placeholder, None),
            };

            match (env::var(name), default) {
                (Ok(value), _) => result.push_str(&value),
                (Err(_), Some(default)) => result.push_str(default),
                (Err(_), None) => {
                    warn!("Environment variable '{}' not found", name);
                    result.push_str(&rest[start..start + end + 3]);
                }
            }
            rest = &after[end + 1..];
        }

        result.push_str(rest);
        result
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut WardenConfig) -> ConfigResult<()> {
        if let Some(value) = self.var("TOKEN_SECRET") {
            config.authority.token.secret = value;
        }
        if let Some(value) = self.var("TOKEN_ISSUER") {
            config.authority.token.issuer = value;
        }
        if let Some(ttl) = self.parsed_var::<i64>("TOKEN_TTL_SECS")? {
            config.authority.token.ttl_secs = ttl;
        }
        if let Some(port) = self.parsed_var::<u16>("AUTHORITY_PORT")? {
            config.authority.port = port;
        }
        if let Some(value) = self.var("CIPHER_SECRET") {
            config.resource.cipher_secret = value;
        }
        if let Some(value) = self.var("AUTHORITY_URL") {
            config.resource.authority_url = value;
        }
        if let Some(port) = self.parsed_var::<u16>("RESOURCE_PORT")? {
            config.resource.port = port;
        }
        if let Some(timeout) = self.parsed_var::<u64>("VALIDATION_TIMEOUT_MS")? {
            config.resource.validation_timeout_ms = timeout;
        }
        if let Some(value) = self.var("LOG_LEVEL") {
            config.logging.level = value;
        }
        Ok(())
    }

    fn var(&self, suffix: &str) -> Option<String> {
        env::var(format!("{}_{}", self.env_prefix, suffix)).ok()
    }

    fn parsed_var<T>(&self, suffix: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let name = format!("{}_{}", self.env_prefix, suffix);
        match env::var(&name) {
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::invalid_env_var(name, e.to_string())),
            Err(_) => Ok(None),
        }
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }
}

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => {
            let config = config::Config::builder()
                .add_source(config::File::from_str(content, config::FileFormat::Yaml))
                .build()
                .map_err(|e| ConfigError::serialization(e.to_string()))?;
            config
                .try_deserialize()
                .map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<WardenConfig> {
    ConfigLoader::new().load(path)
}

// =============================================================================
// Tests
// =============================================================================
