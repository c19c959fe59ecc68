use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use common::types::PaginationMeta;
use models::{provider, review, user};
use crate::{errors::ServiceError, pagination::Pagination};

pub async fn list_reviews_by_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
    opts: Pagination,
) -> Result<(Vec<review::Model>, PaginationMeta), ServiceError> {
    let query = review::Entity::find()
        .filter(review::Column::ProviderId.eq(provider_id))
        .order_by_desc(review::Column::CreatedAt);
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, opts.meta(total)))
}

pub async fn get_review(db: &DatabaseConnection, id: Uuid) -> Result<Option<review::Model>, ServiceError> {
    review::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create a review; the save hook keeps the provider aggregate in sync.
pub async fn create_review(
    db: &DatabaseConnection,
    provider_id: Uuid,
    user_id: Uuid,
    rating: i16,
    title: &str,
    body: &str,
) -> Result<review::Model, ServiceError> {
    if !(1..=5).contains(&rating) {
        return Err(ServiceError::Validation("rating must be between 1 and 5".into()));
    }
    if title.trim().is_empty() || body.trim().is_empty() {
        return Err(ServiceError::Validation("title and body are required".into()));
    }
    if provider::Entity::find_by_id(provider_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .is_none()
    {
        return Err(ServiceError::not_found("provider"));
    }
    if user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .is_none()
    {
        return Err(ServiceError::not_found("user"));
    }
    let now = Utc::now().into();
    let am = review::ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(provider_id),
        user_id: Set(user_id),
        rating: Set(rating),
        title: Set(title.to_string()),
        body: Set(body.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_review(
    db: &DatabaseConnection,
    id: Uuid,
    rating: Option<i16>,
    title: Option<String>,
    body: Option<String>,
) -> Result<review::Model, ServiceError> {
    if let Some(r) = rating {
        if !(1..=5).contains(&r) {
            return Err(ServiceError::Validation("rating must be between 1 and 5".into()));
        }
    }
    let mut am: review::ActiveModel = review::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("review"))?
        .into();
    if let Some(r) = rating {
        am.rating = Set(r);
    }
    if let Some(t) = title {
        am.title = Set(t);
    }
    if let Some(b) = body {
        am.body = Set(b);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete through the entity so the `after_delete` hook refreshes the aggregate.
pub async fn delete_review(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let Some(found) = review::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
    else {
        return Ok(false);
    };
    let am: review::ActiveModel = found.into();
    am.delete(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn rating_aggregate_follows_review_lifecycle() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;

        let p = models::provider::create(&db, &format!("Pipes {}", Uuid::new_v4()), "p@pipes.example", None, None, None, None).await?;
        let u = models::user::create(&db, &format!("rev_{}@example.com", Uuid::new_v4()), "Reviewer").await?;

        let r1 = create_review(&db, p.id, u.id, 5, "Great", "Fixed everything.").await?;
        let r2 = create_review(&db, p.id, u.id, 3, "Okay", "A bit slow.").await?;

        let refreshed = models::provider::Entity::find_by_id(p.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.review_count, 2);
        assert!((refreshed.average_rating - 4.0).abs() < 1e-9);

        update_review(&db, r2.id, Some(1), None, None).await?;
        let refreshed = models::provider::Entity::find_by_id(p.id).one(&db).await?.unwrap();
        assert!((refreshed.average_rating - 3.0).abs() < 1e-9);

        delete_review(&db, r1.id).await?;
        delete_review(&db, r2.id).await?;
        let refreshed = models::provider::Entity::find_by_id(p.id).one(&db).await?.unwrap();
        assert_eq!(refreshed.review_count, 0);
        assert_eq!(refreshed.average_rating, 0.0);

        models::provider::Entity::delete_by_id(p.id).exec(&db).await?;
        models::user::hard_delete(&db, u.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_rating_rejected() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;
        let err = create_review(&db, Uuid::new_v4(), Uuid::new_v4(), 6, "t", "b").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        Ok(())
    }
}
