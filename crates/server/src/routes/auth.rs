use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use common::types::Single;
use service::auth::{
    domain::{LoginInput, RegisterInput},
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
};
use service::auth::errors::AuthError;
use service::faq::repository::SeaOrmFaqRepository;
use service::faq::FaqService;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub faqs: Arc<FaqService<SeaOrmFaqRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, jwt_secret: String) -> Self {
        let faqs = Arc::new(FaqService::new(Arc::new(SeaOrmFaqRepository { db: db.clone() })));
        Self { db, auth: ServerAuthConfig { jwt_secret }, faqs }
    }

    fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        AuthService::new(
            Arc::new(SeaOrmAuthRepository { db: self.db.clone() }),
            AuthConfig {
                jwt_secret: Some(self.auth.jwt_secret.clone()),
                password_algorithm: "argon2".into(),
            },
        )
    }
}

/// The authenticated caller, inserted by [`require_bearer`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    sub: String,
    uid: String,
    exp: usize,
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub token: String,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

fn map_auth_error(e: AuthError) -> JsonApiError {
    match e {
        AuthError::Validation(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())),
        AuthError::Conflict => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
        AuthError::NotFound => JsonApiError::not_found("user not found"),
        AuthError::Unauthorized => JsonApiError::unauthorized("invalid credentials"),
        _ => JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string())),
    }
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth",
    responses((status = 200, description = "Registered"), (status = 400, description = "Validation Error"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<Single<RegisterOutput>>, JsonApiError> {
    let user = state.auth_service().register(input).await.map_err(map_auth_error)?;
    Ok(Json(Single::new(RegisterOutput { user_id: user.id })))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth",
    responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<Single<LoginOutput>>), JsonApiError> {
    let session = state.auth_service().login(input).await.map_err(map_auth_error)?;
    let user = session.user;
    let token = session
        .token
        .ok_or_else(|| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some("token generation failed".into())))?;

    let mut cookie = Cookie::new("auth_token", token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(axum_extra::extract::cookie::SameSite::Lax);
    let jar = jar.add(cookie);
    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, token };
    Ok((jar, Json(Single::new(out))))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from("auth_token"));
    (jar, StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<ServerState>,
    axum::Extension(current): axum::Extension<CurrentUser>,
) -> Result<Json<Single<MeOutput>>, JsonApiError> {
    let user = models::user::Entity::find_by_id(current.id)
        .one(&state.db)
        .await
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string())))?
        .ok_or_else(|| JsonApiError::not_found("user not found"))?;
    Ok(Json(Single::new(MeOutput { user_id: user.id, email: user.email, name: user.name })))
}

/// Route-layer middleware guarding authenticated endpoints.
///
/// Accepts `Authorization: Bearer <token>` or the `auth_token` cookie set at
/// login; missing or invalid tokens yield 401. CORS preflight passes through.
pub async fn require_bearer(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let header_token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string());
    let token = header_token
        .or_else(|| jar.get("auth_token").map(|c| c.value().to_string()))
        .ok_or_else(|| JsonApiError::unauthorized("missing bearer token"))?;

    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        warn!(error = %e, path = %req.uri().path(), "token rejected");
        JsonApiError::unauthorized("invalid or expired token")
    })?;

    let uid = Uuid::parse_str(&decoded.claims.uid)
        .map_err(|_| JsonApiError::unauthorized("invalid token subject"))?;
    req.extensions_mut().insert(CurrentUser { id: uid, email: decoded.claims.sub });

    Ok(next.run(req).await)
}
