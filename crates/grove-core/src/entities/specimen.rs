use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A tracked specimen. Top-level owner of updates, measurements, photos,
/// notifications, accolades and at most one graveyard entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Specimen {
    pub id: i64,
    pub name: String,
    pub species_id: Option<i64>,
    pub acquisition_date: Option<NaiveDate>,
    pub origin_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub development_stage: Option<String>,
    /// Free-form lifecycle status (`active`, `graveyard`, ...).
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Specimen {
    /// Status assigned when a row omits it.
    pub const DEFAULT_STATUS: &'static str = "active";
}
