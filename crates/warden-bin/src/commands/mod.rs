// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `authority` / `resource`: run a server until a shutdown signal
//! - `validate`: validate configuration
//! - `encrypt` / `decrypt`: apply the secret cipher
//! - `inspect`: decode a token without verifying it
//! - `probe`: query a running authority
//! - `version`: show version information

mod cipher;
mod inspect;
mod probe;
mod serve;
mod validate;
mod version;

pub use cipher::{decrypt, encrypt};
pub use inspect::inspect;
pub use probe::probe;
pub use serve::{run_authority, run_resource};
pub use validate::validate;
pub use version::version;

use warden_config::{ConfigFormat, ConfigLoader, WardenConfig};

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.command.clone() {
        Commands::Authority(args) => serve::run_authority(&cli, args).await,
        Commands::Resource(args) => serve::run_resource(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Encrypt(args) => cipher::encrypt(&cli, args),
        Commands::Decrypt(args) => cipher::decrypt(&cli, args),
        Commands::Inspect(args) => inspect::inspect(&cli, args),
        Commands::Probe(args) => probe::probe(&cli, args).await,
        Commands::Version => version::version(&cli),
    }
}

/// Loads the configuration file, or defaults plus `WARDEN_*` overrides
/// when no file was given.
pub(crate) fn load_config(cli: &Cli) -> BinResult<WardenConfig> {
    let loader = ConfigLoader::new();
    let config = match &cli.config {
        Some(path) => loader.load(path)?,
        None => loader.load_from_str("{}", ConfigFormat::Json)?,
    };
    Ok(config)
}
