use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reminder. `specimen_id == None` marks a general reminder that is not
/// attached to any specimen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: i64,
    pub specimen_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub category: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
