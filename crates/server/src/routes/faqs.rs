use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::types::{Collection, Single};
use models::faq;
use service::faq::repository::FaqInput;
use service::faq::FaqStats;

use crate::errors::JsonApiError;
use crate::routes::{auth::ServerState, PageQuery};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub q: String,
}

/// Free-text search over published FAQs, best match first.
#[utoipa::path(get, path = "/api/faqs/search", tag = "faqs", params(SearchQuery),
    responses((status = 200, description = "Ranked matches"), (status = 400, description = "Query too short")))]
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Single<Vec<faq::Model>>>, JsonApiError> {
    let ranked = state.faqs.search(&query.q).await?;
    Ok(Json(Single::new(ranked)))
}

/// Count one view for the entry.
#[utoipa::path(post, path = "/api/faqs/{id}/view", tag = "faqs",
    responses((status = 200, description = "Counted"), (status = 404, description = "Unknown FAQ")))]
pub async fn view(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<faq::Model>>, JsonApiError> {
    let updated = state.faqs.view(id).await?;
    Ok(Json(Single::new(updated)))
}

#[utoipa::path(get, path = "/api/faqs/stats", tag = "faqs",
    responses((status = 200, description = "Counters")))]
pub async fn stats(State(state): State<ServerState>) -> Result<Json<Single<FaqStats>>, JsonApiError> {
    let stats = state.faqs.stats().await?;
    Ok(Json(Single::new(stats)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Collection<faq::Model>>, JsonApiError> {
    let all = state.faqs.list().await?;
    let total = all.len() as u64;
    let p = q.pagination();
    let (page_idx, per_page) = p.normalize();
    let items = all
        .into_iter()
        .skip((page_idx * per_page) as usize)
        .take(per_page as usize)
        .collect();
    Ok(Json(Collection::new(items, p.meta(total))))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Single<faq::Model>>, JsonApiError> {
    match state.faqs.get(id).await? {
        Some(found) => Ok(Json(Single::new(found))),
        None => Err(JsonApiError::not_found("faq not found")),
    }
}

#[derive(Debug, Deserialize)]
pub struct FaqBody {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

impl From<FaqBody> for FaqInput {
    fn from(b: FaqBody) -> Self {
        FaqInput { question: b.question, answer: b.answer, keywords: b.keywords, published: b.published }
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<FaqBody>,
) -> Result<Json<Single<faq::Model>>, JsonApiError> {
    let created = state.faqs.create(input.into()).await?;
    info!(faq_id = %created.id, "faq created");
    Ok(Json(Single::new(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<FaqBody>,
) -> Result<Json<Single<faq::Model>>, JsonApiError> {
    let updated = state.faqs.update(id, input.into()).await?;
    Ok(Json(Single::new(updated)))
}

pub async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    if state.faqs.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("faq not found"))
    }
}
