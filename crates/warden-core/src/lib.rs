// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-core
//!
//! Shared primitives for the warden token authority and resource server.
//!
//! ## Modules
//!
//! - [`types`]: account identifiers, roles and identities
//! - [`claims`]: signed token claims and raw claim maps
//! - [`context`]: the per-request authentication context
//! - [`guard`]: the role/ownership authorization decision
//! - [`cipher`]: AES-128-CBC protection for stored secrets
//! - [`protocol`]: wire types exchanged between the two services
//! - [`error`]: the error taxonomy shared by every crate
//!
//! ## Trust Flow
//!
//! ```text
//! bearer token -> TokenVerifier verdict -> AuthContext -> AuthorizationGuard -> SecretCipher
//! ```
//!
//! Every step runs inside a single request. Nothing here holds mutable
//! process-wide state; the only shared values are the read-only signing
//! key and the read-only cipher key.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cipher;
pub mod claims;
pub mod context;
pub mod error;
pub mod guard;
pub mod protocol;
pub mod types;

pub use cipher::SecretCipher;
pub use claims::{ClaimMap, Claims};
pub use context::AuthContext;
pub use error::{CipherError, CoreResult, TokenError, WardenError};
pub use guard::{AccessGrant, AuthorizationGuard};
pub use types::{AccountId, Identity, Role};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
