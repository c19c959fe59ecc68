use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::rate_limit::FixedWindowLimiter;
use crate::openapi::ApiDoc;
use crate::routes::{self, ServerState};
use service::runtime;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: &configs::AppConfig) -> anyhow::Result<SocketAddr> {
    let host = if cfg.server.host.trim().is_empty() {
        env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    } else {
        cfg.server.host.clone()
    };
    let port = if cfg.server.port == 0 {
        env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()).unwrap_or(8080)
    } else {
        cfg.server.port
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Write the `config.json` the frontend fetches at boot.
async fn write_frontend_config(cfg: &configs::AppConfig) -> anyhow::Result<()> {
    let body = cfg.frontend.render_boot_config()?;
    tokio::fs::write(&cfg.frontend.output_path, body).await?;
    info!(path = %cfg.frontend.output_path, "frontend boot config written");
    Ok(())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let mut cfg = configs::load_default().unwrap_or_default();
    cfg.frontend.normalize_from_env();

    runtime::ensure_env("frontend", "data").await?;
    write_frontend_config(&cfg).await?;

    // DB connection
    let db = models::db::connect().await?;

    // JWT secret
    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());
    let state = ServerState::new(db, jwt_secret);

    // Fixed-window limiter for the two public POST endpoints
    let limiter = FixedWindowLimiter::from_config(&cfg.rate_limit);

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, limiter, cors)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Bind and serve; ConnectInfo feeds the client-IP middleware
    let addr = load_bind_addr(&cfg)?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
