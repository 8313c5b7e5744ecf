// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors surfaced by the `warden` binary and their exit statuses.

use thiserror::Error;
use warden_core::{CipherError, TokenError, WardenError};

/// Shorthand used by every subcommand.
pub type BinResult<T> = Result<T, BinError>;

/// Failure of a `warden` subcommand. Each variant maps to a distinct exit
/// status so scripts can tell a bad config from a crashed server.
#[derive(Debug, Error)]
pub enum BinError {
    /// Bad or incomplete settings detected by the binary itself.
    #[error("configuration: {0}")]
    Configuration(String),

    /// A server or client could not be constructed.
    #[error("startup: {0}")]
    Initialization(String),

    #[error("{0}")]
    #[allow(missing_docs)]
    Runtime(String),

    #[error("io: {0}")]
    #[allow(missing_docs)]
    Io(String),

    #[error(transparent)]
    #[allow(missing_docs)]
    Api(#[from] warden_api::ApiError),

    #[error(transparent)]
    #[allow(missing_docs)]
    Config(#[from] warden_config::ConfigError),

    #[error(transparent)]
    #[allow(missing_docs)]
    Core(#[from] WardenError),
}

impl BinError {
    /// See [`BinError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// See [`BinError::Initialization`].
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    #[allow(missing_docs)]
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Process exit status. 5 is left unused.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Initialization(_) => 2,
            Self::Runtime(_) => 3,
            Self::Io(_) => 4,
            Self::Api(_) => 6,
            Self::Core(_) => 7,
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<CipherError> for BinError {
    fn from(err: CipherError) -> Self {
        Self::Core(err.into())
    }
}

impl From<TokenError> for BinError {
    fn from(err: TokenError) -> Self {
        Self::Core(err.into())
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{:#}", err))
    }
}

/// Prints `error` and every source beneath it to stderr.
pub fn report_error(error: &BinError) {
    eprintln!("warden: {}", error);
    let mut cause = std::error::Error::source(error);
    while let Some(inner) = cause {
        eprintln!("  because: {}", inner);
        cause = inner.source();
    }
}

/// [`report_error`], then exit with [`BinError::exit_code`].
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BinError::config("missing secret");
        assert_eq!(err.to_string(), "configuration: missing secret");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BinError::config("x").exit_code(), 1);
        assert_eq!(BinError::init("x").exit_code(), 2);
        assert_eq!(BinError::runtime("x").exit_code(), 3);
        assert_eq!(BinError::from(CipherError::Padding).exit_code(), 7);
    }

    #[test]
    fn test_from_anyhow_keeps_context() {
        let err: BinError = anyhow::anyhow!("inner").context("outer").into();
        assert_eq!(err.to_string(), "outer: inner");
    }
}
