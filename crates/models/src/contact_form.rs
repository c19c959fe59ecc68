use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue, ConnectionTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::normalize;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_form")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTimeWithTimeZone,
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
        if let ActiveValue::Set(name) = &self.name {
            self.name = Set(normalize::collapse_whitespace(name));
        }
        if let ActiveValue::Set(email) = &self.email {
            self.email = Set(normalize::email(email));
        }
        if let ActiveValue::Set(subject) = &self.subject {
            self.subject = Set(normalize::collapse_whitespace(subject));
        }
        if let ActiveValue::Set(message) = &self.message {
            self.message = Set(normalize::trim(message));
        }
        Ok(self)
    }
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<Model, errors::ModelError> {
    user::validate_email(email)?;
    if name.trim().is_empty() || subject.trim().is_empty() || message.trim().is_empty() {
        return Err(errors::ModelError::Validation("name, subject and message are required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        subject: Set(subject.to_string()),
        message: Set(message.to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
