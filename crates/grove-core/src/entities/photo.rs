use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A photo of a specimen. `full_path` and `thumbnail_path` are relative to
/// the media root (`full/...` and `thumbs/...`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Photo {
    pub id: i64,
    pub specimen_id: i64,
    pub update_id: Option<i64>,
    pub description: Option<String>,
    pub taken_at: Option<DateTime<Utc>>,
    pub full_path: String,
    pub thumbnail_path: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}
