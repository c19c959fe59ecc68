use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use models::{favorite, provider};
use crate::errors::ServiceError;

/// Add a provider to a user's favorites; a second add is a conflict.
pub async fn add_favorite(db: &DatabaseConnection, user_id: Uuid, provider_id: Uuid) -> Result<favorite::Model, ServiceError> {
    if provider::Entity::find_by_id(provider_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .is_none()
    {
        return Err(ServiceError::not_found("provider"));
    }
    let existing = favorite::Entity::find_by_id((user_id, provider_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::conflict("provider already in favorites"));
    }
    let am = favorite::ActiveModel {
        user_id: Set(user_id),
        provider_id: Set(provider_id),
        created_at: Set(Utc::now().into()),
    };
    let created = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(%user_id, %provider_id, "favorite_added");
    Ok(created)
}

pub async fn remove_favorite(db: &DatabaseConnection, user_id: Uuid, provider_id: Uuid) -> Result<(), ServiceError> {
    let res = favorite::Entity::delete_by_id((user_id, provider_id))
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("favorite"));
    }
    Ok(())
}

/// The user's favorite providers, newest favorite first.
pub async fn list_favorites(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<provider::Model>, ServiceError> {
    let links = favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(user_id))
        .order_by_desc(favorite::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let ids: Vec<Uuid> = links.iter().map(|l| l.provider_id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut providers = provider::Entity::find()
        .filter(provider::Column::Id.is_in(ids.clone()))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    // keep the favorites ordering, not the query's
    providers.sort_by_key(|p| ids.iter().position(|id| *id == p.id).unwrap_or(usize::MAX));
    Ok(providers)
}
