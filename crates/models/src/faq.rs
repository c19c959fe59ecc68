use sea_orm::{entity::prelude::*, ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::normalize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faq")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub keywords: Json,
    pub view_count: i32,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(q) = &self.question {
            self.question = Set(normalize::collapse_whitespace(q));
        }
        if let ActiveValue::Set(a) = &self.answer {
            self.answer = Set(normalize::trim(a));
        }
        if let ActiveValue::Set(k) = &self.keywords {
            if !k.is_array() {
                return Err(DbErr::Custom("keywords must be a JSON array".into()));
            }
        }
        Ok(self)
    }
}

impl Model {
    /// Keyword strings out of the stored JSON array; non-strings are skipped.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(keywords: serde_json::Value) -> Model {
        Model {
            id: Uuid::new_v4(),
            question: "How do I book?".into(),
            answer: "Use the contact form.".into(),
            keywords,
            view_count: 0,
            published: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn keyword_list_reads_strings() {
        let m = sample(serde_json::json!(["booking", "schedule", 7]));
        assert_eq!(m.keyword_list(), vec!["booking".to_string(), "schedule".to_string()]);
    }

    #[test]
    fn keyword_list_tolerates_non_array() {
        let m = sample(serde_json::json!({"nope": true}));
        assert!(m.keyword_list().is_empty());
    }
}
