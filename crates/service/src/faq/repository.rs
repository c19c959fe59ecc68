use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement};
use tracing::warn;
use uuid::Uuid;

use models::faq;
use crate::errors::ServiceError;

/// Input for FAQ create/update.
#[derive(Debug, Clone)]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
    pub published: bool,
}

#[async_trait]
pub trait FaqRepository: Send + Sync {
    async fn list_published(&self) -> Result<Vec<faq::Model>, ServiceError>;
    async fn list_all(&self) -> Result<Vec<faq::Model>, ServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<faq::Model>, ServiceError>;
    async fn create(&self, input: FaqInput) -> Result<faq::Model, ServiceError>;
    async fn update(&self, id: Uuid, input: FaqInput) -> Result<faq::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    /// Increment the view counter by exactly one and return the new state.
    async fn increment_view(&self, id: Uuid) -> Result<faq::Model, ServiceError>;
    /// Most-viewed entries, best first.
    async fn top_viewed(&self, limit: u64) -> Result<Vec<faq::Model>, ServiceError>;
}

fn validate(input: &FaqInput) -> Result<(), ServiceError> {
    if input.question.trim().is_empty() || input.answer.trim().is_empty() {
        return Err(ServiceError::Validation("question and answer are required".into()));
    }
    Ok(())
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmFaqRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl FaqRepository for SeaOrmFaqRepository {
    async fn list_published(&self) -> Result<Vec<faq::Model>, ServiceError> {
        faq::Entity::find()
            .filter(faq::Column::Published.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<faq::Model>, ServiceError> {
        faq::Entity::find()
            .order_by_desc(faq::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find(&self, id: Uuid) -> Result<Option<faq::Model>, ServiceError> {
        faq::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn create(&self, input: FaqInput) -> Result<faq::Model, ServiceError> {
        validate(&input)?;
        let now = Utc::now().into();
        let am = faq::ActiveModel {
            id: Set(Uuid::new_v4()),
            question: Set(input.question),
            answer: Set(input.answer),
            keywords: Set(serde_json::json!(input.keywords)),
            view_count: Set(0),
            published: Set(input.published),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(&self, id: Uuid, input: FaqInput) -> Result<faq::Model, ServiceError> {
        validate(&input)?;
        let mut am: faq::ActiveModel = faq::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("faq"))?
            .into();
        am.question = Set(input.question);
        am.answer = Set(input.answer);
        am.keywords = Set(serde_json::json!(input.keywords));
        am.published = Set(input.published);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = faq::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }

    async fn increment_view(&self, id: Uuid) -> Result<faq::Model, ServiceError> {
        use sea_orm::ConnectionTrait;

        let found = faq::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("faq"))?;
        let next = found.view_count + 1;
        let mut am: faq::ActiveModel = found.into();
        am.view_count = Set(next);
        am.updated_at = Set(Utc::now().into());
        match am.update(&self.db).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                // entity update failed; retry as a direct statement before
                // giving up
                warn!(error = %e, faq_id = %id, "entity view-count update failed; using direct statement");
                self.db
                    .execute(Statement::from_sql_and_values(
                        self.db.get_database_backend(),
                        r#"UPDATE "faq" SET "view_count" = "view_count" + 1 WHERE "id" = $1"#,
                        [id.into()],
                    ))
                    .await
                    .map_err(|e| ServiceError::Db(e.to_string()))?;
                faq::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(|e| ServiceError::Db(e.to_string()))?
                    .ok_or_else(|| ServiceError::not_found("faq"))
            }
        }
    }

    async fn top_viewed(&self, limit: u64) -> Result<Vec<faq::Model>, ServiceError> {
        faq::Entity::find()
            .filter(faq::Column::Published.eq(true))
            .order_by_desc(faq::Column::ViewCount)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }
}

/// In-memory repository for search/stats tests.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockFaqRepository {
        entries: Mutex<HashMap<Uuid, faq::Model>>,
    }

    impl MockFaqRepository {
        pub fn with_entries(entries: Vec<faq::Model>) -> Self {
            let map = entries.into_iter().map(|e| (e.id, e)).collect();
            Self { entries: Mutex::new(map) }
        }
    }

    #[async_trait]
    impl FaqRepository for MockFaqRepository {
        async fn list_published(&self) -> Result<Vec<faq::Model>, ServiceError> {
            let entries = self.entries.lock().unwrap();
            Ok(entries.values().filter(|e| e.published).cloned().collect())
        }

        async fn list_all(&self) -> Result<Vec<faq::Model>, ServiceError> {
            let entries = self.entries.lock().unwrap();
            Ok(entries.values().cloned().collect())
        }

        async fn find(&self, id: Uuid) -> Result<Option<faq::Model>, ServiceError> {
            let entries = self.entries.lock().unwrap();
            Ok(entries.get(&id).cloned())
        }

        async fn create(&self, input: FaqInput) -> Result<faq::Model, ServiceError> {
            validate(&input)?;
            let now = Utc::now().into();
            let entry = faq::Model {
                id: Uuid::new_v4(),
                question: input.question,
                answer: input.answer,
                keywords: serde_json::json!(input.keywords),
                view_count: 0,
                published: input.published,
                created_at: now,
                updated_at: now,
            };
            self.entries.lock().unwrap().insert(entry.id, entry.clone());
            Ok(entry)
        }

        async fn update(&self, id: Uuid, input: FaqInput) -> Result<faq::Model, ServiceError> {
            validate(&input)?;
            let mut entries = self.entries.lock().unwrap();
            let entry = entries.get_mut(&id).ok_or_else(|| ServiceError::not_found("faq"))?;
            entry.question = input.question;
            entry.answer = input.answer;
            entry.keywords = serde_json::json!(input.keywords);
            entry.published = input.published;
            Ok(entry.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.entries.lock().unwrap().remove(&id).is_some())
        }

        async fn increment_view(&self, id: Uuid) -> Result<faq::Model, ServiceError> {
            let mut entries = self.entries.lock().unwrap();
            let entry = entries.get_mut(&id).ok_or_else(|| ServiceError::not_found("faq"))?;
            entry.view_count += 1;
            Ok(entry.clone())
        }

        async fn top_viewed(&self, limit: u64) -> Result<Vec<faq::Model>, ServiceError> {
            let entries = self.entries.lock().unwrap();
            let mut all: Vec<faq::Model> = entries.values().filter(|e| e.published).cloned().collect();
            all.sort_unstable_by(|a, b| b.view_count.cmp(&a.view_count));
            all.truncate(limit as usize);
            Ok(all)
        }
    }
}
