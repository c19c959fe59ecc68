use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use common::types::Single;
use models::newsletter_subscription as subscription;
use service::newsletter_service;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct SubscribeInput {
    pub email: String,
}

/// Public subscription endpoint; sits behind the fixed-window rate limiter.
#[utoipa::path(post, path = "/api/newsletter-subscriptions", tag = "newsletter",
    responses((status = 200, description = "Subscribed"), (status = 409, description = "Already subscribed"), (status = 429, description = "Rate limited")))]
pub async fn subscribe(
    State(state): State<ServerState>,
    Json(input): Json<SubscribeInput>,
) -> Result<Json<Single<subscription::Model>>, JsonApiError> {
    let created = newsletter_service::subscribe(&state.db, &input.email).await?;
    info!(email = %created.email, "newsletter subscription accepted");
    Ok(Json(Single::new(created)))
}

/// Unsubscribe by the opaque token from the subscription email.
#[utoipa::path(delete, path = "/api/newsletter-subscriptions/{token}", tag = "newsletter",
    responses((status = 200, description = "Unsubscribed"), (status = 404, description = "Unknown token")))]
pub async fn unsubscribe(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> Result<Json<Single<subscription::Model>>, JsonApiError> {
    let updated = newsletter_service::unsubscribe(&state.db, &token).await?;
    Ok(Json(Single::new(updated)))
}
