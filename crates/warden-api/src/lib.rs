// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-api
//!
//! HTTP services for warden.
//!
//! - [`AuthorityServer`]: holds the signing key, registers accounts, issues
//!   tokens and answers verdict requests from other services.
//! - [`ResourceServer`]: holds the cipher key, asks the authority about every
//!   bearer token and guards per-account encrypted secrets.
//!
//! ## Request Path (resource server)
//!
//! ```text
//! AuthLayer (fail-open) -> Auth extractor -> AuthorizationGuard -> store -> SecretCipher
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod service;
pub mod state;
pub mod store;
pub mod verifier;

pub use auth::{AccountStore, InMemoryAccountStore, TokenAuthority};
pub use error::{ApiError, ApiResult};
pub use middleware::AuthLayer;
pub use server::{AuthorityServer, ResourceServer};
pub use service::{SecretInput, SecretService, SecretView, UserService};
pub use state::{AuthorityState, ResourceState};
pub use store::{AccountDirectory, InMemorySecretStore, SecretStore, UserProfile};
pub use verifier::{RemoteValidationClient, TokenVerifier};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
