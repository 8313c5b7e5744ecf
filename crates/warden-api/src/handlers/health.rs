// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handlers.

use axum::Json;
use warden_core::protocol::HealthStatus;

/// Service name reported by the resource server's health check.
pub const RESOURCE_SERVICE_NAME: &str = "warden-resource";

/// GET /health
///
/// Liveness only. Does not contact the token authority.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::up(RESOURCE_SERVICE_NAME))
}
