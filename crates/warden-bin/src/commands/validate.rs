// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use super::load_config;
use crate::cli::{Cli, ValidateArgs};
use crate::error::BinResult;

/// Validates the configuration for both services.
///
/// A section that fails its own checks is reported as a warning so one
/// file can be checked before either service is deployed.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config = load_config(cli)?;

    let source = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults and environment)".to_string());

    // A missing section is only a warning: each service needs just its own.
    let mut warnings: Vec<String> = Vec::new();
    for (service, outcome) in [
        ("authority", config.validate_authority()),
        ("resource", config.validate_resource()),
    ] {
        match outcome {
            Ok(()) => {}
            Err(e) if e.is_validation() => warnings.push(format!("{}: {}", service, e)),
            Err(e) => return Err(e.into()),
        }
    }

    println!("Configuration loaded: {}", source);
    println!();
    println!("Summary:");
    println!("  Authority:  {}", config.authority.socket_addr());
    println!("  Issuer:     {}", config.authority.token.issuer);
    println!("  Token TTL:  {}s", config.authority.token.ttl_secs);
    println!("  Admins:     {}", config.authority.admin_subjects.len());
    println!("  Resource:   {}", config.resource.socket_addr());
    println!("  Validator:  {}", config.resource.authority_url);
    println!("  Timeout:    {}ms", config.resource.validation_timeout_ms);

    if !warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &warnings {
            println!("  ! {}", warning);
        }
    }

    if args.show_config {
        println!();
        println!("Parsed configuration (secrets omitted):");
        println!(
            "{}",
            serde_json::to_string_pretty(&config)
                .unwrap_or_else(|_| "(serialization error)".to_string())
        );
    }

    Ok(())
}
