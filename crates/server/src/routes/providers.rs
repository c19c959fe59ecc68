use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::{Collection, Single};
use models::provider;
use service::provider_service::{self, ProviderFilter};

use crate::errors::JsonApiError;
use crate::routes::{auth::ServerState, pagination};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category_id: Option<Uuid>,
    pub city: Option<String>,
    pub verified: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Collection<provider::Model>>, JsonApiError> {
    let filter = ProviderFilter { category_id: q.category_id, city: q.city.clone(), verified: q.verified };
    let (items, meta) = provider_service::list_providers(&state.db, filter, pagination(q.page, q.per_page)).await?;
    Ok(Json(Collection::new(items, meta)))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<provider::Model>>, JsonApiError> {
    match provider_service::get_provider(&state.db, id).await? {
        Some(found) => Ok(Json(Single::new(found))),
        None => Err(JsonApiError::not_found("provider not found")),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProviderInput {
    pub name: String,
    pub email: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateProviderInput>,
) -> Result<Json<Single<provider::Model>>, JsonApiError> {
    let created = provider_service::create_provider(
        &state.db,
        &input.name,
        &input.email,
        input.description,
        input.phone,
        input.city,
        input.website,
        &input.category_ids,
    )
    .await?;
    info!(provider_id = %created.id, name = %created.name, "provider created");
    Ok(Json(Single::new(created)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProviderInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
    pub verified: Option<bool>,
    pub category_ids: Option<Vec<Uuid>>,
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProviderInput>,
) -> Result<Json<Single<provider::Model>>, JsonApiError> {
    let updated = provider_service::update_provider(
        &state.db,
        id,
        input.name.as_deref(),
        input.description,
        input.phone,
        input.city,
        input.website,
        input.verified,
    )
    .await?;
    if let Some(category_ids) = input.category_ids {
        provider_service::set_categories(&state.db, id, &category_ids).await?;
    }
    Ok(Json(Single::new(updated)))
}

pub async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    if provider_service::delete_provider(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("provider not found"))
    }
}
