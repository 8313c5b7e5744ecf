// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `probe` command.

use std::time::Duration;

use warden_api::RemoteValidationClient;
use warden_core::AccountId;

use super::load_config;
use crate::cli::{Cli, ProbeArgs};
use crate::error::BinResult;

/// Asks a running token authority about a token.
///
/// Every answer goes through the fail-closed checks, so an unreachable
/// authority reads as "invalid, expired, no access".
pub async fn probe(cli: &Cli, args: ProbeArgs) -> BinResult<()> {
    let config = load_config(cli)?.resource;

    let base_url = args.authority_url.unwrap_or(config.authority_url.clone());
    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.validation_timeout());

    let client = RemoteValidationClient::new(base_url, timeout)?;
    let token = args.token.trim();

    println!("Authority: {}", client.base_url());
    println!("  valid:   {}", client.check_valid(token).await);
    println!("  expired: {}", client.check_expired(token).await);

    let claims = client.fetch_claims(token).await;
    if claims.is_empty() {
        println!("  claims:  (none)");
    } else {
        println!("  claims:");
        for (name, value) in &claims {
            println!("    {}: {}", name, value);
        }
    }

    if let Some(target) = args.target {
        let allowed = client.check_resource_access(token, AccountId(target)).await;
        println!("  access to account {}: {}", target, allowed);
    }

    Ok(())
}
