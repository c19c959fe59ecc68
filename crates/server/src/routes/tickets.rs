use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::{Collection, Single};
use models::support_ticket;
use service::ticket_service::{self, TicketStatus};

use crate::errors::JsonApiError;
use crate::routes::{auth::ServerState, pagination};

#[derive(Debug, Deserialize)]
pub struct CreateTicketInput {
    pub email: String,
    pub subject: String,
    pub body: String,
    pub user_id: Option<Uuid>,
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateTicketInput>,
) -> Result<Json<Single<support_ticket::Model>>, JsonApiError> {
    let created =
        ticket_service::create_ticket(&state.db, input.user_id, &input.email, &input.subject, &input.body).await?;
    info!(ticket_id = %created.id, "support ticket opened");
    Ok(Json(Single::new(created)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Collection<support_ticket::Model>>, JsonApiError> {
    let status = match &q.status {
        Some(s) => Some(TicketStatus::parse(s)?),
        None => None,
    };
    let (items, meta) = ticket_service::list_tickets(&state.db, status, pagination(q.page, q.per_page)).await?;
    Ok(Json(Collection::new(items, meta)))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<support_ticket::Model>>, JsonApiError> {
    match ticket_service::get_ticket(&state.db, id).await? {
        Some(found) => Ok(Json(Single::new(found))),
        None => Err(JsonApiError::not_found("support ticket not found")),
    }
}

async fn transition(
    state: &ServerState,
    id: Uuid,
    to: TicketStatus,
) -> Result<Json<Single<support_ticket::Model>>, JsonApiError> {
    let updated = ticket_service::transition_ticket(&state.db, id, to).await?;
    info!(ticket_id = %id, status = %updated.status, "ticket transitioned");
    Ok(Json(Single::new(updated)))
}

#[utoipa::path(post, path = "/api/support-tickets/{id}/start", tag = "tickets",
    responses((status = 200, description = "In progress"), (status = 409, description = "Invalid transition")))]
pub async fn start(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<support_ticket::Model>>, JsonApiError> {
    transition(&state, id, TicketStatus::InProgress).await
}

#[utoipa::path(post, path = "/api/support-tickets/{id}/resolve", tag = "tickets",
    responses((status = 200, description = "Resolved"), (status = 409, description = "Invalid transition")))]
pub async fn resolve(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<support_ticket::Model>>, JsonApiError> {
    transition(&state, id, TicketStatus::Resolved).await
}

#[utoipa::path(post, path = "/api/support-tickets/{id}/close", tag = "tickets",
    responses((status = 200, description = "Closed"), (status = 409, description = "Invalid transition")))]
pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<support_ticket::Model>>, JsonApiError> {
    transition(&state, id, TicketStatus::Closed).await
}

#[utoipa::path(post, path = "/api/support-tickets/{id}/reopen", tag = "tickets",
    responses((status = 200, description = "Reopened"), (status = 409, description = "Invalid transition")))]
pub async fn reopen(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<support_ticket::Model>>, JsonApiError> {
    transition(&state, id, TicketStatus::Open).await
}
