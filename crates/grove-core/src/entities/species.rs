use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A botanical species. Referenced by `Specimen::species_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Species {
    pub id: i64,
    pub common_name: String,
    pub scientific_name: Option<String>,
    pub description: Option<String>,
    pub care_instructions: Option<String>,
    /// Denormalized number of specimens of this species.
    pub tree_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
