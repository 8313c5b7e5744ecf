// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `warden version`.

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints component versions and the fixed crypto parameters.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("{} {}", crate::NAME, crate::VERSION);
    for (component, version) in [
        ("warden-core", warden_core::VERSION),
        ("warden-api", warden_api::VERSION),
        ("warden-config", warden_config::VERSION),
    ] {
        println!("  {:<14} {}", component, version);
    }
    println!(
        "  tokens: HS256, default lifetime {}s",
        warden_config::TokenConfig::default().ttl_secs
    );
    println!("  secrets: AES-128-CBC/PKCS7, base64(iv || ciphertext)");
    println!(
        "  built for {}-{}",
        std::env::consts::ARCH,
        std::env::consts::OS
    );
    Ok(())
}
