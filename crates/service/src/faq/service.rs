use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::faq;
use crate::errors::ServiceError;
use crate::faq::repository::{FaqInput, FaqRepository};
use crate::faq::search;

const STATS_TOP_N: u64 = 5;

/// Aggregate counters surfaced by the stats endpoint.
#[derive(Debug, Serialize)]
pub struct FaqStats {
    pub total: u64,
    pub total_views: i64,
    pub top_viewed: Vec<faq::Model>,
}

/// Application service encapsulating FAQ business rules.
pub struct FaqService<R: FaqRepository> {
    repo: Arc<R>,
}

impl<R: FaqRepository> FaqService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Rank published entries against a free-text query.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<faq::Model>, ServiceError> {
        let tokens = search::parse_query(query)?;
        let candidates = self.repo.list_published().await?;
        let ranked = search::rank(&tokens, candidates);
        info!(tokens = tokens.len(), hits = ranked.len(), "faq_search");
        Ok(ranked)
    }

    /// Count one view and return the refreshed entry.
    pub async fn view(&self, id: Uuid) -> Result<faq::Model, ServiceError> {
        self.repo.increment_view(id).await
    }

    pub async fn stats(&self) -> Result<FaqStats, ServiceError> {
        let all = self.repo.list_all().await?;
        let total = all.len() as u64;
        let total_views = all.iter().map(|e| e.view_count as i64).sum();
        let top_viewed = self.repo.top_viewed(STATS_TOP_N).await?;
        Ok(FaqStats { total, total_views, top_viewed })
    }

    pub async fn list(&self) -> Result<Vec<faq::Model>, ServiceError> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<faq::Model>, ServiceError> {
        self.repo.find(id).await
    }

    pub async fn create(&self, input: FaqInput) -> Result<faq::Model, ServiceError> {
        self.repo.create(input).await
    }

    pub async fn update(&self, id: Uuid, input: FaqInput) -> Result<faq::Model, ServiceError> {
        self.repo.update(id, input).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faq::repository::mock::MockFaqRepository;
    use chrono::Utc;

    fn entry(question: &str, answer: &str, keywords: &[&str], views: i32, published: bool) -> faq::Model {
        faq::Model {
            id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            keywords: serde_json::json!(keywords),
            view_count: views,
            published,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn service(entries: Vec<faq::Model>) -> FaqService<MockFaqRepository> {
        FaqService::new(Arc::new(MockFaqRepository::with_entries(entries)))
    }

    #[tokio::test]
    async fn search_rejects_queries_without_usable_tokens() {
        let svc = service(vec![]);
        assert!(matches!(svc.search("xx").await.unwrap_err(), ServiceError::Validation(_)));
        assert!(matches!(svc.search("a b c").await.unwrap_err(), ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn search_skips_unpublished_entries() {
        let hidden = entry("Booking a plumber", "Draft.", &[], 0, false);
        let visible = entry("Booking basics", "From the provider page.", &["booking"], 0, true);
        let svc = service(vec![hidden.clone(), visible.clone()]);
        let hits = svc.search("booking").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, visible.id);
    }

    #[tokio::test]
    async fn view_increments_by_one_per_call() {
        let e = entry("Payments", "Cards.", &[], 7, true);
        let id = e.id;
        let svc = service(vec![e]);
        assert_eq!(svc.view(id).await.unwrap().view_count, 8);
        assert_eq!(svc.view(id).await.unwrap().view_count, 9);
    }

    #[tokio::test]
    async fn view_unknown_id_not_found() {
        let svc = service(vec![]);
        assert!(matches!(svc.view(Uuid::new_v4()).await.unwrap_err(), ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn stats_totals_and_top() {
        let a = entry("A", "a", &[], 10, true);
        let b = entry("B", "b", &[], 3, true);
        let c = entry("C", "c", &[], 25, false);
        let svc = service(vec![a.clone(), b, c]);
        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.total_views, 38);
        // unpublished entries stay out of the public top list
        assert_eq!(stats.top_viewed.first().map(|e| e.id), Some(a.id));
    }
}
