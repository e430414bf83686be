use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A care event performed on a specimen (repotting, pruning, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Update {
    pub id: i64,
    pub specimen_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub performed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
