use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A numeric measurement of a specimen, optionally recorded as part of an
/// update. When `update_id` is set it must reference an update of the same
/// specimen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub id: i64,
    pub specimen_id: i64,
    pub update_id: Option<i64>,
    pub measured_at: Option<DateTime<Utc>>,
    pub height_cm: Option<f64>,
    pub trunk_diameter_cm: Option<f64>,
    pub canopy_width_cm: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
