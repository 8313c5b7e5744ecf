// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Secret handlers.

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiResult;
use crate::extractors::{AccountPath, Auth, SecretPath, ValidatedJson};
use crate::service::{SecretInput, SecretView};
use crate::state::ResourceState;

/// POST /api/secrets/user/{userId}
pub async fn create_secret(
    State(state): State<ResourceState>,
    AccountPath(owner): AccountPath,
    Auth(ctx): Auth,
    ValidatedJson(input): ValidatedJson<SecretInput>,
) -> ApiResult<(StatusCode, Json<SecretView>)> {
    let view = state.secrets.create(&ctx, owner, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/secrets/user/{userId}
pub async fn list_secrets(
    State(state): State<ResourceState>,
    AccountPath(owner): AccountPath,
    Auth(ctx): Auth,
) -> ApiResult<Json<Vec<SecretView>>> {
    Ok(Json(state.secrets.list(&ctx, owner).await?))
}

/// GET /api/secrets/user/{userId}/{secretId}
pub async fn get_secret(
    State(state): State<ResourceState>,
    SecretPath(owner, id): SecretPath,
    Auth(ctx): Auth,
) -> ApiResult<Json<SecretView>> {
    Ok(Json(state.secrets.get(&ctx, owner, id).await?))
}

/// PUT /api/secrets/user/{userId}/{secretId}
pub async fn update_secret(
    State(state): State<ResourceState>,
    SecretPath(owner, id): SecretPath,
    Auth(ctx): Auth,
    ValidatedJson(input): ValidatedJson<SecretInput>,
) -> ApiResult<Json<SecretView>> {
    Ok(Json(state.secrets.update(&ctx, owner, id, input).await?))
}

/// DELETE /api/secrets/user/{userId}/{secretId}
pub async fn delete_secret(
    State(state): State<ResourceState>,
    SecretPath(owner, id): SecretPath,
    Auth(ctx): Auth,
) -> ApiResult<StatusCode> {
    state.secrets.delete(&ctx, owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
