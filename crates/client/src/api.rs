use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use common::types::{Collection, Single};

use crate::config::BootConfig;
use crate::views::{
    CategoryView, FaqStatsView, FaqView, FeaturedPlacementView, ProviderView, ReviewView, SessionView,
    SubscriptionView, TicketView,
};
use crate::ClientError;

/// HTTP wrapper over the REST API the frontend talks to.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn from_config(cfg: BootConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            token: cfg.api_token,
        }
    }

    /// Replace the bearer token, e.g. after login.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ClientError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(parse_api_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryView>, ClientError> {
        let envelope: Collection<CategoryView> = self.send(self.request(Method::GET, "/categories")).await?;
        Ok(envelope.data)
    }

    pub async fn list_providers(&self, category_id: Option<Uuid>, city: Option<&str>) -> Result<Vec<ProviderView>, ClientError> {
        let mut req = self.request(Method::GET, "/providers");
        if let Some(cid) = category_id {
            req = req.query(&[("category_id", cid.to_string())]);
        }
        if let Some(city) = city {
            req = req.query(&[("city", city)]);
        }
        let envelope: Collection<ProviderView> = self.send(req).await?;
        Ok(envelope.data)
    }

    pub async fn get_provider(&self, id: Uuid) -> Result<ProviderView, ClientError> {
        let envelope: Single<ProviderView> = self.send(self.request(Method::GET, &format!("/providers/{id}"))).await?;
        Ok(envelope.data)
    }

    pub async fn provider_reviews(&self, provider_id: Uuid) -> Result<Vec<ReviewView>, ClientError> {
        let envelope: Collection<ReviewView> =
            self.send(self.request(Method::GET, &format!("/providers/{provider_id}/reviews"))).await?;
        Ok(envelope.data)
    }

    pub async fn search_faqs(&self, query: &str) -> Result<Vec<FaqView>, ClientError> {
        let req = self.request(Method::GET, "/faqs/search").query(&[("q", query)]);
        let envelope: Single<Vec<FaqView>> = self.send(req).await?;
        Ok(envelope.data)
    }

    pub async fn record_faq_view(&self, id: Uuid) -> Result<FaqView, ClientError> {
        let envelope: Single<FaqView> = self.send(self.request(Method::POST, &format!("/faqs/{id}/view"))).await?;
        Ok(envelope.data)
    }

    pub async fn faq_stats(&self) -> Result<FaqStatsView, ClientError> {
        let envelope: Single<FaqStatsView> = self.send(self.request(Method::GET, "/faqs/stats")).await?;
        Ok(envelope.data)
    }

    pub async fn active_featured(&self) -> Result<Vec<FeaturedPlacementView>, ClientError> {
        let envelope: Single<Vec<FeaturedPlacementView>> =
            self.send(self.request(Method::GET, "/featured-providers/active")).await?;
        Ok(envelope.data)
    }

    pub async fn submit_contact_form(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), ClientError> {
        let req = self
            .request(Method::POST, "/contact-forms")
            .json(&json!({ "name": name, "email": email, "subject": subject, "message": message }));
        let _: serde_json::Value = self.send(req).await?;
        Ok(())
    }

    pub async fn subscribe_newsletter(&self, email: &str) -> Result<SubscriptionView, ClientError> {
        let req = self.request(Method::POST, "/newsletter-subscriptions").json(&json!({ "email": email }));
        let envelope: Single<SubscriptionView> = self.send(req).await?;
        Ok(envelope.data)
    }

    pub async fn unsubscribe_newsletter(&self, token: &str) -> Result<SubscriptionView, ClientError> {
        let envelope: Single<SubscriptionView> =
            self.send(self.request(Method::DELETE, &format!("/newsletter-subscriptions/{token}"))).await?;
        Ok(envelope.data)
    }

    /// Log in and keep the returned token for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<SessionView, ClientError> {
        let req = self.request(Method::POST, "/auth/login").json(&json!({ "email": email, "password": password }));
        let envelope: Single<SessionView> = self.send(req).await?;
        self.token = Some(envelope.data.token.clone());
        Ok(envelope.data)
    }

    pub async fn list_favorites(&self) -> Result<Vec<ProviderView>, ClientError> {
        let envelope: Single<Vec<ProviderView>> = self.send(self.request(Method::GET, "/users/favorites")).await?;
        Ok(envelope.data)
    }

    pub async fn add_favorite(&self, provider_id: Uuid) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .send_no_body(self.request(Method::POST, &format!("/users/favorites/{provider_id}")))
            .await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, provider_id: Uuid) -> Result<(), ClientError> {
        self.send_no_body(self.request(Method::DELETE, &format!("/users/favorites/{provider_id}"))).await?;
        Ok(())
    }

    pub async fn open_ticket(&self, email: &str, subject: &str, body: &str) -> Result<TicketView, ClientError> {
        let req = self
            .request(Method::POST, "/support-tickets")
            .json(&json!({ "email": email, "subject": subject, "body": body }));
        let envelope: Single<TicketView> = self.send(req).await?;
        Ok(envelope.data)
    }

    pub async fn resolve_ticket(&self, id: Uuid) -> Result<TicketView, ClientError> {
        let envelope: Single<TicketView> =
            self.send(self.request(Method::POST, &format!("/support-tickets/{id}/resolve"))).await?;
        Ok(envelope.data)
    }

    async fn send_no_body(&self, req: RequestBuilder) -> Result<serde_json::Value, ClientError> {
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ClientError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(parse_api_error(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Map a non-2xx body to `ClientError::Api`, tolerating non-JSON bodies.
fn parse_api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| body.chars().take(200).collect());
    ClientError::Api { status: status.as_u16(), message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_is_parsed() {
        let body = r#"{"error": {"status": 409, "name": "Conflict", "message": "provider already in favorites"}}"#;
        let err = parse_api_error(StatusCode::CONFLICT, body);
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "provider already in favorites");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_json_error_body_is_truncated_verbatim() {
        let err = parse_api_error(StatusCode::BAD_GATEWAY, "upstream fell over");
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream fell over");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = ApiClient::from_config(BootConfig {
            api_url: "http://localhost:8080/api/".into(),
            api_token: None,
        });
        assert_eq!(c.base_url, "http://localhost:8080/api");
    }
}
