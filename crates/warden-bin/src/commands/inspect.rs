// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `inspect` command.

use warden_api::auth::decode_unverified;
use warden_core::claims::is_expired_at;

use crate::cli::{Cli, InspectArgs};
use crate::error::{BinError, BinResult};

/// Prints a token's claims without checking its signature.
pub fn inspect(_cli: &Cli, args: InspectArgs) -> BinResult<()> {
    let claims = decode_unverified(args.token.trim())?;

    eprintln!("WARNING: signature NOT verified. These claims prove nothing.");

    if let Some(exp) = claims.get("exp").and_then(|v| v.as_i64()) {
        let state = if is_expired_at(exp, chrono::Utc::now()) {
            "expired"
        } else {
            "not expired"
        };
        eprintln!("exp: {} ({})", exp, state);
    }

    let rendered = serde_json::to_string_pretty(&claims)
        .map_err(|e| BinError::runtime(format!("Failed to render claims: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
