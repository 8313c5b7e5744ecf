// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-bin
//!
//! Command line entry point for the warden services.
//!
//! ```text
//! main.rs -> cli.rs -> commands/* -> warden-api servers
//!                   -> logging.rs
//!                   -> shutdown.rs
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Run the token authority
//! WARDEN_TOKEN_SECRET=... warden authority
//!
//! # Run the resource server against it
//! WARDEN_CIPHER_SECRET=... warden resource --authority-url http://127.0.0.1:8081
//!
//! # Check configuration
//! warden -c warden.yaml validate
//!
//! # Encrypt a value the way stored secrets are encrypted
//! warden encrypt "p@ss1" --secret k1
//!
//! # Look inside a token (no verification)
//! warden inspect <token>
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
