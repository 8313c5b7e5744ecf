// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account profile handlers.

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiResult;
use crate::extractors::{AccountPath, Auth, ValidatedJson};
use crate::service::UserUpdate;
use crate::state::ResourceState;
use crate::store::UserProfile;

/// GET /api/users
///
/// Admin only.
pub async fn list_users(
    State(state): State<ResourceState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(state.users.list(&ctx)?))
}

/// GET /api/users/me
pub async fn current_user(
    State(state): State<ResourceState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.users.me(&ctx)?))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<ResourceState>,
    AccountPath(id): AccountPath,
    Auth(ctx): Auth,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.users.get(&ctx, id)?))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<ResourceState>,
    AccountPath(id): AccountPath,
    Auth(ctx): Auth,
    ValidatedJson(update): ValidatedJson<UserUpdate>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(state.users.update(&ctx, id, update)?))
}

/// DELETE /api/users/{id}
///
/// Also deletes the account's secrets.
pub async fn delete_user(
    State(state): State<ResourceState>,
    AccountPath(id): AccountPath,
    Auth(ctx): Auth,
) -> ApiResult<StatusCode> {
    state.users.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
