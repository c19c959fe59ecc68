use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue, ConnectionTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::normalize;
use crate::user;

pub const STATUS_OPEN: &str = "open";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_RESOLVED: &str = "resolved";
pub const STATUS_CLOSED: &str = "closed";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "support_ticket")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub resolved_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(email) = &self.email {
            self.email = Set(normalize::email(email));
        }
        if let ActiveValue::Set(subject) = &self.subject {
            self.subject = Set(normalize::collapse_whitespace(subject));
        }
        if let ActiveValue::Set(body) = &self.body {
            self.body = Set(normalize::trim(body));
        }
        Ok(self)
    }
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Option<Uuid>,
    email: &str,
    subject: &str,
    body: &str,
) -> Result<Model, errors::ModelError> {
    user::validate_email(email)?;
    if subject.trim().is_empty() || body.trim().is_empty() {
        return Err(errors::ModelError::Validation("subject and body are required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        email: Set(email.to_string()),
        subject: Set(subject.to_string()),
        body: Set(body.to_string()),
        status: Set(STATUS_OPEN.to_string()),
        resolved_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
