use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use common::types::PaginationMeta;
use models::{category, provider, provider_category};
use crate::{errors::ServiceError, pagination::Pagination};

/// Filters accepted by the provider listing.
#[derive(Debug, Default, Clone)]
pub struct ProviderFilter {
    pub category_id: Option<Uuid>,
    pub city: Option<String>,
    pub verified: Option<bool>,
}

pub async fn list_providers(
    db: &DatabaseConnection,
    filter: ProviderFilter,
    opts: Pagination,
) -> Result<(Vec<provider::Model>, PaginationMeta), ServiceError> {
    let mut query = provider::Entity::find().order_by_asc(provider::Column::Name);
    if let Some(cid) = filter.category_id {
        let provider_ids: Vec<Uuid> = provider_category::Entity::find()
            .filter(provider_category::Column::CategoryId.eq(cid))
            .all(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .into_iter()
            .map(|link| link.provider_id)
            .collect();
        query = query.filter(provider::Column::Id.is_in(provider_ids));
    }
    if let Some(city) = filter.city {
        query = query.filter(provider::Column::City.eq(city));
    }
    if let Some(verified) = filter.verified {
        query = query.filter(provider::Column::Verified.eq(verified));
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, opts.meta(total)))
}

pub async fn get_provider(db: &DatabaseConnection, id: Uuid) -> Result<Option<provider::Model>, ServiceError> {
    provider::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create a provider and attach it to the given categories in one transaction.
#[instrument(skip(db, description), fields(name = %name))]
pub async fn create_provider(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    description: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    website: Option<String>,
    category_ids: &[Uuid],
) -> Result<provider::Model, ServiceError> {
    for cid in category_ids {
        if category::Entity::find_by_id(*cid)
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .is_none()
        {
            return Err(ServiceError::not_found("category"));
        }
    }
    let created = provider::create(db, name, email, description, phone, city, website).await?;
    if !category_ids.is_empty() {
        set_categories(db, created.id, category_ids).await?;
    }
    info!(provider_id = %created.id, categories = category_ids.len(), "provider_created");
    Ok(created)
}

/// Replace the provider↔category links with the given set.
pub async fn set_categories(db: &DatabaseConnection, provider_id: Uuid, category_ids: &[Uuid]) -> Result<(), ServiceError> {
    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    provider_category::Entity::delete_many()
        .filter(provider_category::Column::ProviderId.eq(provider_id))
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    for cid in category_ids {
        let am = provider_category::ActiveModel {
            provider_id: Set(provider_id),
            category_id: Set(*cid),
        };
        am.insert(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    }
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

pub async fn update_provider(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    description: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    website: Option<String>,
    verified: Option<bool>,
) -> Result<provider::Model, ServiceError> {
    let mut am: provider::ActiveModel = provider::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("provider"))?
        .into();
    if let Some(name) = name {
        let name = models::normalize::collapse_whitespace(name);
        if name.is_empty() {
            return Err(ServiceError::Validation("name required".into()));
        }
        let slug = category::slugify(&name);
        am.name = Set(name);
        am.slug = Set(slug);
    }
    if let Some(desc) = description {
        am.description = Set(Some(desc));
    }
    if let Some(phone) = phone {
        am.phone = Set(Some(phone));
    }
    if let Some(city) = city {
        am.city = Set(Some(city));
    }
    if let Some(website) = website {
        am.website = Set(Some(website));
    }
    if let Some(verified) = verified {
        am.verified = Set(verified);
    }
    am.updated_at = Set(chrono::Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn delete_provider(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = provider::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn provider_crud_with_categories() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;

        let cat = crate::category_service::create_category(&db, &format!("Tiling {}", Uuid::new_v4()), None, None, None).await?;
        let name = format!("Ada's Tiles {}", Uuid::new_v4());
        let created = create_provider(&db, &name, "ada@tiles.example", None, None, Some("Duluth".into()), None, &[cat.id]).await?;
        assert_eq!(created.review_count, 0);

        let (by_cat, _) = list_providers(
            &db,
            ProviderFilter { category_id: Some(cat.id), ..Default::default() },
            Pagination::default(),
        )
        .await?;
        assert!(by_cat.iter().any(|p| p.id == created.id));

        let updated = update_provider(&db, created.id, None, None, None, None, None, Some(true)).await?;
        assert!(updated.verified);

        assert!(delete_provider(&db, created.id).await?);
        assert!(crate::category_service::delete_category(&db, cat.id).await?);
        Ok(())
    }
}
