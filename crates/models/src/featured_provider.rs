use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::provider;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "featured_provider")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub position: i32,
    pub active: bool,
    pub starts_at: DateTimeWithTimeZone,
    pub ends_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Provider,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this placement is live at `now`.
    pub fn is_live(&self, now: DateTimeWithTimeZone) -> bool {
        if !self.active || self.starts_at > now {
            return false;
        }
        match self.ends_at {
            Some(end) => end > now,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn placement(active: bool, starts: i64, ends: Option<i64>) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            position: 0,
            active,
            starts_at: (now + Duration::hours(starts)).into(),
            ends_at: ends.map(|h| (now + Duration::hours(h)).into()),
            created_at: now.into(),
        }
    }

    #[test]
    fn live_within_window() {
        assert!(placement(true, -1, Some(1)).is_live(Utc::now().into()));
    }

    #[test]
    fn not_live_when_inactive_or_outside_window() {
        let now = Utc::now().into();
        assert!(!placement(false, -1, Some(1)).is_live(now));
        assert!(!placement(true, 1, None).is_live(now));
        assert!(!placement(true, -2, Some(-1)).is_live(now));
    }
}
