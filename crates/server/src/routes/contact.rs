use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::{Collection, Single};
use models::contact_form;
use service::contact_service;

use crate::errors::JsonApiError;
use crate::routes::{auth::ServerState, PageQuery};

#[derive(Debug, Deserialize)]
pub struct ContactFormInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Public submission endpoint; sits behind the fixed-window rate limiter.
#[utoipa::path(post, path = "/api/contact-forms", tag = "contact",
    responses((status = 200, description = "Accepted"), (status = 400, description = "Validation Error"), (status = 429, description = "Rate limited")))]
pub async fn submit(
    State(state): State<ServerState>,
    Json(input): Json<ContactFormInput>,
) -> Result<Json<Single<contact_form::Model>>, JsonApiError> {
    let created =
        contact_service::submit_contact_form(&state.db, &input.name, &input.email, &input.subject, &input.message)
            .await?;
    info!(contact_form_id = %created.id, "contact form accepted");
    Ok(Json(Single::new(created)))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<contact_form::Model>>, JsonApiError> {
    match contact_service::get_contact_form(&state.db, id).await? {
        Some(found) => Ok(Json(Single::new(found))),
        None => Err(JsonApiError::not_found("contact form not found")),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Collection<contact_form::Model>>, JsonApiError> {
    let (items, meta) = contact_service::list_contact_forms(&state.db, q.pagination()).await?;
    Ok(Json(Collection::new(items, meta)))
}
