// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-config
//!
//! Configuration for the warden token authority and resource server.
//!
//! ## Features
//!
//! - **Schema Definition**: one file configures either or both services
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Placeholders**: `${VAR}` and `${VAR:default}` resolved before parsing
//! - **Environment Overrides**: `WARDEN_*` variables applied after parsing
//!
//! ## Quick Start
//!
//! ```no_run
//! use warden_config::loader::load_config;
//!
//! let config = load_config("warden.yaml").unwrap();
//! config.validate_authority().unwrap();
//! println!("Authority listens on {}", config.authority.socket_addr());
//! ```
//!
//! ## Configuration Schema
//!
//! - `authority` - token signing, issuer, TTL and bind address
//! - `resource` - authority URL, validation timeout, cipher secret and bind address
//! - `logging` - level and output format

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigFormat, ConfigLoader};
pub use schema::{AuthorityConfig, LoggingConfig, ResourceConfig, TokenConfig, WardenConfig};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
