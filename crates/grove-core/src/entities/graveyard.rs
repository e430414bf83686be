use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marks a specimen as moved to the graveyard. One-to-one with `Specimen`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraveyardEntry {
    pub id: i64,
    pub specimen_id: i64,
    pub category: String,
    pub note: Option<String>,
    pub moved_at: DateTime<Utc>,
}

impl GraveyardEntry {
    pub const DEFAULT_CATEGORY: &'static str = "dead";
}
