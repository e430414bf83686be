use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An award or distinction earned by a specimen, optionally illustrated by
/// one of its photos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Accolade {
    pub id: i64,
    pub specimen_id: i64,
    pub title: String,
    pub photo_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
