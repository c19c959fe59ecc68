use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::pagination::Pagination;

use crate::middleware::{client_ip, rate_limit::{self, FixedWindowLimiter}};

pub mod auth;
pub mod categories;
pub mod contact;
pub mod faqs;
pub mod favorites;
pub mod featured;
pub mod newsletter;
pub mod providers;
pub mod reviews;
pub mod tickets;

pub use auth::ServerState;

/// Common `?page=&per_page=` listing parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        pagination(self.page, self.per_page)
    }
}

/// Fill listing parameters with the service-layer defaults.
pub fn pagination(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    let d = Pagination::default();
    Pagination { page: page.unwrap_or(d.page), per_page: per_page.unwrap_or(d.per_page) }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: static assets, public API, the two
/// rate-limited public POSTs, and bearer-protected routes.
pub fn build_router(state: ServerState, limiter: FixedWindowLimiter, cors: CorsLayer) -> Router {
    let static_dir = ServeDir::new("frontend").fallback(ServeFile::new("frontend/index.html"));

    let public = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/categories", get(categories::list))
        .route("/api/categories/:id", get(categories::get_one))
        .route("/api/providers", get(providers::list))
        .route("/api/providers/:id", get(providers::get_one))
        .route("/api/providers/:id/reviews", get(reviews::list_for_provider))
        .route("/api/reviews/:id", get(reviews::get_one))
        .route("/api/faqs", get(faqs::list))
        .route("/api/faqs/search", get(faqs::search))
        .route("/api/faqs/stats", get(faqs::stats))
        .route("/api/faqs/:id", get(faqs::get_one))
        .route("/api/faqs/:id/view", post(faqs::view))
        .route("/api/featured-providers/active", get(featured::active))
        .route("/api/newsletter-subscriptions/:token", delete(newsletter::unsubscribe))
        .route("/api/support-tickets", post(tickets::create));

    // The two public POST endpoints behind the fixed-window limiter
    let limited = Router::new()
        .route("/api/contact-forms", post(contact::submit))
        .route("/api/newsletter-subscriptions", post(newsletter::subscribe))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit::limit_by_ip));

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/categories", post(categories::create))
        .route("/api/categories/:id", put(categories::update).delete(categories::remove))
        .route("/api/providers", post(providers::create))
        .route("/api/providers/:id", put(providers::update).delete(providers::remove))
        .route("/api/providers/:id/reviews", post(reviews::create))
        .route("/api/reviews/:id", put(reviews::update).delete(reviews::remove))
        .route("/api/faqs", post(faqs::create))
        .route("/api/faqs/:id", put(faqs::update).delete(faqs::remove))
        .route("/api/users/favorites", get(favorites::list))
        .route("/api/users/favorites/:provider_id", post(favorites::add).delete(favorites::remove))
        .route("/api/featured-providers", post(featured::create))
        .route("/api/featured-providers/:id", delete(featured::remove))
        .route("/api/contact-forms", get(contact::list))
        .route("/api/contact-forms/:id", get(contact::get_one))
        .route("/api/support-tickets", get(tickets::list))
        .route("/api/support-tickets/:id", get(tickets::get_one))
        .route("/api/support-tickets/:id/start", post(tickets::start))
        .route("/api/support-tickets/:id/resolve", post(tickets::resolve))
        .route("/api/support-tickets/:id/close", post(tickets::close))
        .route("/api/support-tickets/:id/reopen", post(tickets::reopen))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer));

    Router::new()
        .merge(public)
        .merge(limited)
        .merge(protected)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(middleware::from_fn(client_ip::extract_client_ip))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
