use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use models::newsletter_subscription as subscription;
use models::normalize;
use crate::errors::ServiceError;

/// Subscribe an address. An address that is already subscribed is a
/// conflict; a previously unsubscribed address is reactivated in place.
pub async fn subscribe(db: &DatabaseConnection, email: &str) -> Result<subscription::Model, ServiceError> {
    models::user::validate_email(email)?;
    let normalized = normalize::email(email);
    let existing = subscription::Entity::find()
        .filter(subscription::Column::Email.eq(normalized.clone()))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    if let Some(existing) = existing {
        if existing.subscribed {
            return Err(ServiceError::conflict("email already subscribed"));
        }
        let mut am: subscription::ActiveModel = existing.into();
        am.subscribed = Set(true);
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        info!(email = %updated.email, "newsletter_resubscribed");
        return Ok(updated);
    }

    let now = Utc::now().into();
    let am = subscription::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        email: Set(normalized),
        token: Set(subscription::new_token()),
        subscribed: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(email = %created.email, "newsletter_subscribed");
    Ok(created)
}

/// Deactivate by unsubscribe token.
pub async fn unsubscribe(db: &DatabaseConnection, token: &str) -> Result<subscription::Model, ServiceError> {
    let found = subscription::Entity::find()
        .filter(subscription::Column::Token.eq(token))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("subscription"))?;
    let mut am: subscription::ActiveModel = found.into();
    am.subscribed = Set(false);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    #[tokio::test]
    async fn subscribe_twice_conflicts_then_unsubscribe_and_resubscribe() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;

        let email = format!("news_{}@example.com", Uuid::new_v4());
        let created = subscribe(&db, &email).await?;
        assert!(created.subscribed);

        let err = subscribe(&db, &email.to_uppercase()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let off = unsubscribe(&db, &created.token).await?;
        assert!(!off.subscribed);

        // reactivation keeps the original row and token
        let back = subscribe(&db, &email).await?;
        assert_eq!(back.id, created.id);
        assert_eq!(back.token, created.token);

        subscription::Entity::delete_by_id(created.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn unknown_token_not_found() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;
        let err = unsubscribe(&db, "no-such-token").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
