use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use common::types::{Collection, Single};
use models::category;
use service::category_service;

use crate::errors::JsonApiError;
use crate::routes::{auth::ServerState, pagination};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub parent_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Collection<category::Model>>, JsonApiError> {
    let (items, meta) = category_service::list_categories(&state.db, q.parent_id, pagination(q.page, q.per_page)).await?;
    Ok(Json(Collection::new(items, meta)))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<category::Model>>, JsonApiError> {
    match category_service::get_category(&state.db, id).await? {
        Some(found) => Ok(Json(Single::new(found))),
        None => Err(JsonApiError::not_found("category not found")),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<Json<Single<category::Model>>, JsonApiError> {
    let created =
        category_service::create_category(&state.db, &input.name, input.description, input.icon, input.parent_id)
            .await?;
    Ok(Json(Single::new(created)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<Uuid>,
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<Single<category::Model>>, JsonApiError> {
    let updated = category_service::update_category(
        &state.db,
        id,
        input.name.as_deref(),
        input.description,
        input.icon,
        input.parent_id.map(Some),
    )
    .await?;
    Ok(Json(Single::new(updated)))
}

pub async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    if category_service::delete_category(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("category not found"))
    }
}
