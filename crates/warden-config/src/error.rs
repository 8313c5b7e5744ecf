// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while loading and checking configuration.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why a configuration could not be produced.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but its contents do not parse.
    #[error("{}: invalid configuration: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Content parsed from a string (no file) did not deserialize.
    #[error("invalid configuration: {message}")]
    Serialization { message: String },

    /// A value is present but unusable.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// A secret the selected service needs is empty.
    #[error("{field}: secret is not configured")]
    MissingSecret { field: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: no such configuration file", path.display())]
    FileNotFound { path: PathBuf },

    /// A `WARDEN_*` override did not parse into the field's type.
    #[error("environment override {name}: {message}")]
    InvalidEnvVar { name: String, message: String },

    /// File extension other than yaml/yml, toml or json.
    #[error("unsupported configuration format '{format}'")]
    UnsupportedFormat { format: String },
}

impl ConfigError {
    /// File content did not parse.
    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// String content did not parse.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// `field` holds an unusable value.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// `field` is an empty secret.
    pub fn missing_secret(field: impl Into<String>) -> Self {
        Self::MissingSecret {
            field: field.into(),
        }
    }

    /// Reading `path` failed.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// `path` does not exist.
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::FileNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Override `name` did not parse.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Unknown file extension.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// True for errors found after parsing, i.e. the file was readable but
    /// not usable for the requested service.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::MissingSecret { .. })
    }

    /// Dotted path of the offending field, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::MissingSecret { field } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = ConfigError::missing_secret("resource.cipher_secret");
        assert_eq!(err.to_string(), "resource.cipher_secret: secret is not configured");
        assert_eq!(err.field(), Some("resource.cipher_secret"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_errors_are_not_validation() {
        let err = ConfigError::parse("/etc/warden.yaml", "expected a mapping");
        assert!(err.to_string().starts_with("/etc/warden.yaml:"));
        assert!(!err.is_validation());
        assert!(err.field().is_none());
        assert!(!ConfigError::serialization("bad").is_validation());
    }
}
