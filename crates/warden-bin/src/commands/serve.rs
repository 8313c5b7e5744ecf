// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `authority` and `resource` commands.

use std::sync::Arc;

use tracing::info;
use warden_api::{
    AuthorityServer, AuthorityState, RemoteValidationClient, ResourceServer, ResourceState,
};

use super::load_config;
use crate::cli::{Cli, ResourceArgs, ServeArgs};
use crate::error::BinResult;
use crate::shutdown::ShutdownCoordinator;

/// Runs the token authority until a shutdown signal arrives.
pub async fn run_authority(cli: &Cli, args: ServeArgs) -> BinResult<()> {
    let mut config = load_config(cli)?;
    if let Some(port) = args.port {
        config.authority.port = port;
    }
    config.validate_authority()?;

    let state = AuthorityState::new(config.authority.clone())?;
    let server = AuthorityServer::new(state);

    info!(
        version = crate::VERSION,
        addr = %server.addr(),
        issuer = %config.authority.token.issuer,
        ttl_secs = config.authority.token.ttl_secs,
        "Token authority configured"
    );

    let shutdown = ShutdownCoordinator::new();
    shutdown.listen_for_os_signals();
    server.run_with_shutdown(shutdown.signal()).await?;

    Ok(())
}

/// Runs the resource server until a shutdown signal arrives.
pub async fn run_resource(cli: &Cli, args: ResourceArgs) -> BinResult<()> {
    let mut config = load_config(cli)?;
    if let Some(port) = args.port {
        config.resource.port = port;
    }
    if let Some(url) = args.authority_url {
        config.resource.authority_url = url;
    }
    config.validate_resource()?;

    let verifier = Arc::new(RemoteValidationClient::from_config(&config.resource)?);
    let state = ResourceState::new(config.resource.clone(), verifier);
    let server = ResourceServer::new(state);

    info!(
        version = crate::VERSION,
        addr = %server.addr(),
        authority_url = %config.resource.authority_url,
        validation_timeout_ms = config.resource.validation_timeout_ms,
        "Resource server configured"
    );

    let shutdown = ShutdownCoordinator::new();
    shutdown.listen_for_os_signals();
    server.run_with_shutdown(shutdown.signal()).await?;

    Ok(())
}
