use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use common::types::PaginationMeta;
use models::support_ticket::{self, STATUS_CLOSED, STATUS_IN_PROGRESS, STATUS_OPEN, STATUS_RESOLVED};
use crate::{errors::ServiceError, pagination::Pagination};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => STATUS_OPEN,
            TicketStatus::InProgress => STATUS_IN_PROGRESS,
            TicketStatus::Resolved => STATUS_RESOLVED,
            TicketStatus::Closed => STATUS_CLOSED,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ServiceError> {
        match s {
            STATUS_OPEN => Ok(TicketStatus::Open),
            STATUS_IN_PROGRESS => Ok(TicketStatus::InProgress),
            STATUS_RESOLVED => Ok(TicketStatus::Resolved),
            STATUS_CLOSED => Ok(TicketStatus::Closed),
            other => Err(ServiceError::Validation(format!("unknown ticket status: {other}"))),
        }
    }

    /// Allowed edges of the lifecycle graph.
    pub fn can_transition(self, to: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, to),
            (Open, InProgress) | (Open, Resolved) | (InProgress, Resolved) | (Resolved, Closed) | (Resolved, Open) | (Closed, Open)
        )
    }
}

pub async fn create_ticket(
    db: &DatabaseConnection,
    user_id: Option<Uuid>,
    email: &str,
    subject: &str,
    body: &str,
) -> Result<support_ticket::Model, ServiceError> {
    let created = support_ticket::create(db, user_id, email, subject, body).await?;
    info!(ticket_id = %created.id, "ticket_created");
    Ok(created)
}

pub async fn get_ticket(db: &DatabaseConnection, id: Uuid) -> Result<Option<support_ticket::Model>, ServiceError> {
    support_ticket::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn list_tickets(
    db: &DatabaseConnection,
    status: Option<TicketStatus>,
    opts: Pagination,
) -> Result<(Vec<support_ticket::Model>, PaginationMeta), ServiceError> {
    let mut query = support_ticket::Entity::find().order_by_desc(support_ticket::Column::CreatedAt);
    if let Some(status) = status {
        query = query.filter(support_ticket::Column::Status.eq(status.as_str()));
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, opts.meta(total)))
}

/// Move a ticket along the lifecycle graph; invalid edges are conflicts.
#[instrument(skip(db))]
pub async fn transition_ticket(
    db: &DatabaseConnection,
    id: Uuid,
    to: TicketStatus,
) -> Result<support_ticket::Model, ServiceError> {
    let found = support_ticket::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("support ticket"))?;
    let from = TicketStatus::parse(&found.status)?;
    if !from.can_transition(to) {
        return Err(ServiceError::Conflict(format!(
            "cannot move ticket from {} to {}",
            from.as_str(),
            to.as_str()
        )));
    }
    let prior_resolved_at = found.resolved_at;
    let mut am: support_ticket::ActiveModel = found.into();
    am.status = Set(to.as_str().to_string());
    am.resolved_at = Set(match to {
        TicketStatus::Resolved => Some(Utc::now().into()),
        TicketStatus::Open => None,
        // closing keeps the original resolution timestamp
        _ => prior_resolved_at,
    });
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(ticket_id = %id, status = updated.status, "ticket_transitioned");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[test]
    fn transition_graph() {
        use TicketStatus::*;
        assert!(Open.can_transition(InProgress));
        assert!(Open.can_transition(Resolved));
        assert!(InProgress.can_transition(Resolved));
        assert!(Resolved.can_transition(Closed));
        assert!(Resolved.can_transition(Open));
        assert!(Closed.can_transition(Open));

        assert!(!Open.can_transition(Closed));
        assert!(!Closed.can_transition(Resolved));
        assert!(!InProgress.can_transition(Open));
        assert!(!Resolved.can_transition(InProgress));
    }

    #[test]
    fn parse_round_trips() {
        for s in [STATUS_OPEN, STATUS_IN_PROGRESS, STATUS_RESOLVED, STATUS_CLOSED] {
            assert_eq!(TicketStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(TicketStatus::parse("archived").is_err());
    }

    #[tokio::test]
    async fn resolve_then_close_then_reopen() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;

        let t = create_ticket(&db, None, "help@example.com", "No hot water", "Boiler died this morning.").await?;
        assert_eq!(t.status, STATUS_OPEN);

        // closing an open ticket is not a legal edge
        let err = transition_ticket(&db, t.id, TicketStatus::Closed).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let t = transition_ticket(&db, t.id, TicketStatus::Resolved).await?;
        assert!(t.resolved_at.is_some());

        let t = transition_ticket(&db, t.id, TicketStatus::Closed).await?;
        assert!(t.resolved_at.is_some());

        let t = transition_ticket(&db, t.id, TicketStatus::Open).await?;
        assert!(t.resolved_at.is_none());

        support_ticket::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }
}
