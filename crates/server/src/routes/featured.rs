use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use uuid::Uuid;

use common::types::Single;
use models::featured_provider;
use service::featured_service::{self, ActivePlacement};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

/// Placements currently live, ordered by position.
#[utoipa::path(get, path = "/api/featured-providers/active", tag = "featured",
    responses((status = 200, description = "Live placements")))]
pub async fn active(State(state): State<ServerState>) -> Result<Json<Single<Vec<ActivePlacement>>>, JsonApiError> {
    let placements = featured_service::active_placements(&state.db).await?;
    Ok(Json(Single::new(placements)))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlacementInput {
    pub provider_id: Uuid,
    #[serde(default)]
    pub position: i32,
    pub starts_at: Option<DateTime<FixedOffset>>,
    pub ends_at: Option<DateTime<FixedOffset>>,
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreatePlacementInput>,
) -> Result<Json<Single<featured_provider::Model>>, JsonApiError> {
    let created = featured_service::create_placement(
        &state.db,
        input.provider_id,
        input.position,
        input.starts_at,
        input.ends_at,
    )
    .await?;
    Ok(Json(Single::new(created)))
}

pub async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    if featured_service::delete_placement(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("placement not found"))
    }
}
