//! View models the UI binds to, deserialized from API responses.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
    pub verified: bool,
    pub average_rating: f64,
    pub review_count: i32,
}

impl ProviderView {
    /// Rating rounded to one decimal for display, e.g. "4.3".
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.average_rating)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqView {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub view_count: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqStatsView {
    pub total: u64,
    pub total_views: i64,
    #[serde(default)]
    pub top_viewed: Vec<FaqView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketView {
    pub id: Uuid,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub resolved_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionView {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub subscribed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedPlacementView {
    pub placement: PlacementView,
    pub provider: ProviderView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacementView {
    pub id: Uuid,
    pub position: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionView {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_view_maps_api_json() {
        let json = r#"{
            "id": "6b2d84f8-60b3-46be-90b9-1a6e58cf4a23",
            "name": "Ada's Tiles",
            "slug": "adas-tiles",
            "description": null,
            "email": "ada@tiles.example",
            "phone": null,
            "city": "Duluth",
            "website": null,
            "verified": true,
            "average_rating": 4.26,
            "review_count": 12,
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }"#;
        let view: ProviderView = serde_json::from_str(json).unwrap();
        assert_eq!(view.city.as_deref(), Some("Duluth"));
        assert_eq!(view.rating_label(), "4.3");
    }

    #[test]
    fn faq_view_defaults_missing_keywords() {
        let json = r#"{
            "id": "6b2d84f8-60b3-46be-90b9-1a6e58cf4a23",
            "question": "Q",
            "answer": "A",
            "view_count": 3
        }"#;
        let view: FaqView = serde_json::from_str(json).unwrap();
        assert!(view.keywords.is_empty());
    }
}
