use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct ContactFormRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(ToSchema)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(ToSchema)]
pub struct FaqDoc {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
    pub view_count: i32,
    pub published: bool,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::faqs::search,
        crate::routes::faqs::view,
        crate::routes::faqs::stats,
        crate::routes::favorites::list,
        crate::routes::favorites::add,
        crate::routes::favorites::remove,
        crate::routes::featured::active,
        crate::routes::contact::submit,
        crate::routes::newsletter::subscribe,
        crate::routes::newsletter::unsubscribe,
        crate::routes::tickets::start,
        crate::routes::tickets::resolve,
        crate::routes::tickets::close,
        crate::routes::tickets::reopen,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ContactFormRequest,
            SubscribeRequest,
            FaqDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "faqs"),
        (name = "favorites"),
        (name = "featured"),
        (name = "contact"),
        (name = "newsletter"),
        (name = "tickets")
    )
)]
pub struct ApiDoc;
