// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden Integration Tests
//!
//! Cross-crate tests for the token authority, the remote validation client
//! and the resource server.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Configurations and identities used across suites
//!   - `mocks`: Scriptable [`TokenVerifier`](warden_api::TokenVerifier)
//!   - `harness`: A live token authority on an ephemeral port
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p warden-tests
//!
//! cargo test -p warden-tests --test integration_token
//! cargo test -p warden-tests --test integration_cipher
//! cargo test -p warden-tests --test integration_guard
//! cargo test -p warden-tests --test integration_remote
//! cargo test -p warden-tests --test integration_secrets
//! cargo test -p warden-tests --test integration_config
//! ```
//!
//! ## Using the Harness
//!
//! ```rust,ignore
//! use warden_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let authority = AuthorityHarness::start().await;
//!     let alice = authority.register("alice", "alice@example.com", "pw").await;
//!     // ... talk to authority.base_url()
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use crate::common::init_test_logging;
}
