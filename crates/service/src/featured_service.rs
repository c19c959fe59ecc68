use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::{featured_provider, provider};
use crate::errors::ServiceError;

/// A live placement joined with its provider row.
#[derive(Debug, serde::Serialize)]
pub struct ActivePlacement {
    pub placement: featured_provider::Model,
    pub provider: provider::Model,
}

/// Placements whose window contains `now`, ordered by position.
///
/// The date-window check happens in process: placements are few and the
/// `active` flag already narrows the scan.
pub async fn active_placements(db: &DatabaseConnection) -> Result<Vec<ActivePlacement>, ServiceError> {
    let now = Utc::now().into();
    let placements = featured_provider::Entity::find()
        .filter(featured_provider::Column::Active.eq(true))
        .order_by_asc(featured_provider::Column::Position)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let live: Vec<featured_provider::Model> =
        placements.into_iter().filter(|p| p.is_live(now)).collect();
    if live.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = live.iter().map(|p| p.provider_id).collect();
    let providers = provider::Entity::find()
        .filter(provider::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let mut out = Vec::with_capacity(live.len());
    for placement in live {
        if let Some(p) = providers.iter().find(|p| p.id == placement.provider_id) {
            out.push(ActivePlacement { provider: p.clone(), placement });
        }
    }
    Ok(out)
}

pub async fn create_placement(
    db: &DatabaseConnection,
    provider_id: Uuid,
    position: i32,
    starts_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    ends_at: Option<chrono::DateTime<chrono::FixedOffset>>,
) -> Result<featured_provider::Model, ServiceError> {
    if provider::Entity::find_by_id(provider_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .is_none()
    {
        return Err(ServiceError::not_found("provider"));
    }
    let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
    if let (Some(start), Some(end)) = (starts_at.or(Some(now)), ends_at) {
        if end <= start {
            return Err(ServiceError::Validation("ends_at must be after starts_at".into()));
        }
    }
    let am = featured_provider::ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(provider_id),
        position: Set(position),
        active: Set(true),
        starts_at: Set(starts_at.unwrap_or(now)),
        ends_at: Set(ends_at),
        created_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn delete_placement(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = featured_provider::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::Duration;

    #[tokio::test]
    async fn active_lookup_respects_window_and_position() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;

        let p1 = models::provider::create(&db, &format!("First {}", Uuid::new_v4()), "f@ex.example", None, None, None, None).await?;
        let p2 = models::provider::create(&db, &format!("Second {}", Uuid::new_v4()), "s@ex.example", None, None, None, None).await?;

        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let live = create_placement(&db, p1.id, 2, Some(now - Duration::hours(1)), None).await?;
        let live_first = create_placement(&db, p2.id, 1, Some(now - Duration::hours(1)), Some(now + Duration::hours(1))).await?;
        // expired window: stored but never listed
        let expired = create_placement(&db, p1.id, 0, Some(now - Duration::hours(3)), Some(now - Duration::hours(2))).await?;

        let active = active_placements(&db).await?;
        let ours: Vec<_> = active
            .iter()
            .filter(|a| a.provider.id == p1.id || a.provider.id == p2.id)
            .collect();
        assert_eq!(ours.len(), 2);
        assert_eq!(ours[0].provider.id, p2.id, "lower position sorts first");
        assert!(ours.iter().all(|a| a.placement.id != expired.id));

        delete_placement(&db, live.id).await?;
        delete_placement(&db, live_first.id).await?;
        delete_placement(&db, expired.id).await?;
        models::provider::Entity::delete_by_id(p1.id).exec(&db).await?;
        models::provider::Entity::delete_by_id(p2.id).exec(&db).await?;
        Ok(())
    }
}
