use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue, ConnectionTrait, QuerySelect, Set, Statement};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::normalize;
use crate::{provider, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Provider,
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .into(),
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
        if let ActiveValue::Set(r) = &self.rating {
            if !(1..=5).contains(r) {
                return Err(DbErr::Custom("rating must be between 1 and 5".into()));
            }
        }
        if let ActiveValue::Set(title) = &self.title {
            self.title = Set(normalize::collapse_whitespace(title));
        }
        if let ActiveValue::Set(body) = &self.body {
            self.body = Set(normalize::trim(body));
        }
        Ok(self)
    }

    async fn after_save<C>(model: Model, db: &C, _insert: bool) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        refresh_provider_rating(db, model.provider_id).await;
        Ok(model)
    }

    async fn after_delete<C>(self, db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(provider_id) = self.provider_id.try_as_ref().copied() {
            refresh_provider_rating(db, provider_id).await;
        }
        Ok(self)
    }
}

/// Mean rating and count for a set of review ratings.
pub fn aggregate(ratings: &[i16]) -> (f64, i32) {
    if ratings.is_empty() {
        return (0.0, 0);
    }
    let sum: f64 = ratings.iter().map(|r| *r as f64).sum();
    (sum / ratings.len() as f64, ratings.len() as i32)
}

/// Recompute the parent provider's `average_rating`/`review_count`.
///
/// Failures are logged but never propagated: the review write that
/// triggered the hook must not be poisoned by a stale aggregate.
pub async fn refresh_provider_rating<C>(db: &C, provider_id: Uuid)
where
    C: ConnectionTrait,
{
    if let Err(e) = recompute(db, provider_id).await {
        warn!(error = %e, %provider_id, "provider rating refresh failed");
    }
}

async fn recompute<C>(db: &C, provider_id: Uuid) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let ratings: Vec<i16> = Entity::find()
        .select_only()
        .column(Column::Rating)
        .filter(Column::ProviderId.eq(provider_id))
        .into_tuple()
        .all(db)
        .await?;
    let (average, count) = aggregate(&ratings);

    let Some(found) = provider::Entity::find_by_id(provider_id).one(db).await? else {
        // provider cascaded away together with its reviews
        return Ok(());
    };
    let mut am: provider::ActiveModel = found.into();
    am.average_rating = Set(average);
    am.review_count = Set(count);
    am.updated_at = Set(Utc::now().into());
    if let Err(e) = am.update(db).await {
        warn!(error = %e, %provider_id, "entity update failed; retrying with direct statement");
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            r#"UPDATE "provider" SET "average_rating" = $1, "review_count" = $2 WHERE "id" = $3"#,
            [average.into(), count.into(), provider_id.into()],
        ))
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::aggregate;

    #[test]
    fn aggregate_empty_is_zero() {
        assert_eq!(aggregate(&[]), (0.0, 0));
    }

    #[test]
    fn aggregate_means_ratings() {
        let (avg, count) = aggregate(&[5, 4, 3]);
        assert!((avg - 4.0).abs() < f64::EPSILON);
        assert_eq!(count, 3);
    }

    #[test]
    fn aggregate_single() {
        assert_eq!(aggregate(&[2]), (2.0, 1));
    }
}
