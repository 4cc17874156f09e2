//! Masterclass events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::PriceTable;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub venue: String,
    pub city: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
    #[sqlx(json)]
    #[serde(default)]
    pub pricing: PriceTable,
}

impl Event {
    /// Number of calendar days the event spans (at least one)
    pub fn duration_days(&self) -> i64 {
        ((self.ends_at.date_naive() - self.starts_at.date_naive()).num_days() + 1).max(1)
    }
}
