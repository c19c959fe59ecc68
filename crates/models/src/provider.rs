use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::normalize;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    description: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    website: Option<String>,
) -> Result<Model, errors::ModelError> {
    let name = normalize::collapse_whitespace(name);
    if name.is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    user::validate_email(email)?;
    let slug = crate::category::slugify(&name);
    if slug.is_empty() {
        return Err(errors::ModelError::Validation("name must contain alphanumerics".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        description: Set(description.map(|d| normalize::trim(&d))),
        email: Set(normalize::email(email)),
        phone: Set(phone.map(|p| normalize::collapse_whitespace(&p))),
        city: Set(city.map(|c| normalize::collapse_whitespace(&c))),
        website: Set(website),
        verified: Set(false),
        average_rating: Set(0.0),
        review_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
