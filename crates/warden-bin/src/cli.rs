// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `authority`: run the token authority
//! - `resource`: run the resource server
//! - `validate`: validate configuration
//! - `encrypt` / `decrypt`: apply the secret cipher
//! - `inspect`: show a token's claims without verifying it
//! - `probe`: ask a running authority about a token
//! - `version`: show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// warden: token authority and secret-guarding resource server.
#[derive(Parser, Debug)]
#[command(
    name = "warden",
    author = "Sylvex <contact@sylvex.io>",
    version = warden_core::VERSION,
    about = "Token authority and secret-guarding resource server",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long, env = "WARDEN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "WARDEN_LOG_LEVEL", global = true)]
    pub log_level: String,

    /// Log format
    #[arg(long, default_value = "text", env = "WARDEN_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the token authority
    ///
    /// Holds the signing key, registers accounts, issues tokens and answers
    /// validation requests.
    Authority(ServeArgs),

    /// Run the resource server
    ///
    /// Delegates every token check to the authority and guards per-account
    /// encrypted secrets.
    Resource(ResourceArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Encrypt a value with the secret cipher
    Encrypt(CipherArgs),

    /// Decrypt a value produced by `encrypt`
    Decrypt(CipherArgs),

    /// Print a token's claims without verifying its signature
    ///
    /// The output is NOT proof of anything. Anyone can forge these claims.
    Inspect(InspectArgs),

    /// Ask a running token authority about a token
    Probe(ProbeArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments shared by the server commands.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Override the listening port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `resource` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ResourceArgs {
    /// Override the listening port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the token authority base URL
    #[arg(long)]
    pub authority_url: Option<String>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Print the parsed configuration (secrets omitted)
    #[arg(short, long)]
    pub show_config: bool,
}

/// Arguments for the `encrypt` and `decrypt` commands.
#[derive(Args, Debug, Clone)]
pub struct CipherArgs {
    /// Value to process (read from stdin when absent)
    pub value: Option<String>,

    /// Cipher secret
    #[arg(short, long, env = "WARDEN_CIPHER_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}

/// Arguments for the `inspect` command.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Token to decode
    pub token: String,
}

/// Arguments for the `probe` command.
#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Token to ask about
    pub token: String,

    /// Account id for the resource access check
    #[arg(short, long)]
    pub target: Option<u64>,

    /// Token authority base URL (defaults to the configured one)
    #[arg(long)]
    pub authority_url: Option<String>,

    /// Per-call timeout in milliseconds (defaults to the configured one)
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

// =============================================================================
// Tests
// =============================================================================
