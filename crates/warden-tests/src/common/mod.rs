// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Fixtures, mocks and in-process servers shared by the integration tests.

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;

use std::sync::OnceLock;

/// Route `tracing` output through the test harness capture.
///
/// Idempotent. `RUST_LOG` overrides the `warden` debug default.
pub fn init_test_logging() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn,warden=debug".into());
        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Scratch directory for config files, removed on drop.
pub fn temp_test_dir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(&format!("warden-{}", prefix))
        .tempdir()
        .unwrap_or_else(|e| panic!("cannot create scratch dir: {}", e))
}
