use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use common::types::{Collection, Single};
use models::review;
use service::review_service;

use crate::errors::JsonApiError;
use crate::routes::auth::{CurrentUser, ServerState};
use crate::routes::PageQuery;

pub async fn list_for_provider(
    State(state): State<ServerState>,
    Path(provider_id): Path<Uuid>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Collection<review::Model>>, JsonApiError> {
    let (items, meta) = review_service::list_reviews_by_provider(&state.db, provider_id, q.pagination()).await?;
    Ok(Json(Collection::new(items, meta)))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<review::Model>>, JsonApiError> {
    match review_service::get_review(&state.db, id).await? {
        Some(found) => Ok(Json(Single::new(found))),
        None => Err(JsonApiError::not_found("review not found")),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewInput {
    pub rating: i16,
    pub title: String,
    pub body: String,
}

/// Authenticated users review the provider in the path; the save hook keeps
/// the provider's aggregate rating current.
pub async fn create(
    State(state): State<ServerState>,
    Path(provider_id): Path<Uuid>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<CreateReviewInput>,
) -> Result<Json<Single<review::Model>>, JsonApiError> {
    let created =
        review_service::create_review(&state.db, provider_id, current.id, input.rating, &input.title, &input.body)
            .await?;
    Ok(Json(Single::new(created)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewInput {
    pub rating: Option<i16>,
    pub title: Option<String>,
    pub body: Option<String>,
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<UpdateReviewInput>,
) -> Result<Json<Single<review::Model>>, JsonApiError> {
    let found = review_service::get_review(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("review not found"))?;
    if found.user_id != current.id {
        return Err(JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some("not the review author".into())));
    }
    let updated = review_service::update_review(&state.db, id, input.rating, input.title, input.body).await?;
    Ok(Json(Single::new(updated)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, JsonApiError> {
    let found = review_service::get_review(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("review not found"))?;
    if found.user_id != current.id {
        return Err(JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some("not the review author".into())));
    }
    review_service::delete_review(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
