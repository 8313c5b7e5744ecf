// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `tracing` subscriber setup for the binary.

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormat;

/// Crates whose default output drowns ours.
const QUIET_DIRECTIVES: &[&str] = &["hyper=warn", "tower=warn", "reqwest=warn", "axum=info"];

/// Installs the global subscriber. `RUST_LOG`, when set, wins over `level`.
///
/// ```ignore
/// warden_bin::init_logging("debug", warden_bin::cli::LogFormat::Json);
/// ```
pub fn init_logging(level: &str, format: LogFormat) {
    let ansi = std::io::IsTerminal::is_terminal(&std::io::stdout());
    let registry = tracing_subscriber::registry().with(build_filter(level));

    match format {
        LogFormat::Text => registry.with(fmt::layer().with_ansi(ansi)).init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false).with_ansi(ansi))
            .init(),
    }
}

fn build_filter(level: &str) -> EnvFilter {
    let fallback = parse_level(level).to_string().to_lowercase();
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    QUIET_DIRECTIVES
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(base, |filter, directive| filter.add_directive(directive))
}

/// Case-insensitive level name. Anything unrecognised is `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
