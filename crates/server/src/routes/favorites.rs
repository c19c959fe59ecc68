use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;

use common::types::Single;
use models::provider;
use service::favorites_service;

use crate::errors::JsonApiError;
use crate::routes::auth::{CurrentUser, ServerState};

/// The caller's favorite providers, newest first.
#[utoipa::path(get, path = "/api/users/favorites", tag = "favorites",
    responses((status = 200, description = "Favorites"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Single<Vec<provider::Model>>>, JsonApiError> {
    let favorites = favorites_service::list_favorites(&state.db, current.id).await?;
    Ok(Json(Single::new(favorites)))
}

/// Add the provider to the caller's favorites; duplicates are a conflict.
#[utoipa::path(post, path = "/api/users/favorites/{provider_id}", tag = "favorites",
    responses((status = 200, description = "Added"), (status = 404, description = "Unknown provider"), (status = 409, description = "Already a favorite")))]
pub async fn add(
    State(state): State<ServerState>,
    Path(provider_id): Path<Uuid>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, JsonApiError> {
    favorites_service::add_favorite(&state.db, current.id, provider_id).await?;
    info!(user_id = %current.id, %provider_id, "favorite added");
    Ok(StatusCode::OK)
}

#[utoipa::path(delete, path = "/api/users/favorites/{provider_id}", tag = "favorites",
    responses((status = 204, description = "Removed"), (status = 404, description = "Not a favorite")))]
pub async fn remove(
    State(state): State<ServerState>,
    Path(provider_id): Path<Uuid>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, JsonApiError> {
    favorites_service::remove_favorite(&state.db, current.id, provider_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
