//! Whole-dataset snapshot exchanged between the store and the backup engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::{
    Accolade, GraveyardEntry, Measurement, Notification, Photo, Species, Specimen, Update,
};

/// Every managed record, grouped by kind.
///
/// Produced by [`DatasetStore::snapshot`](crate::store::DatasetStore::snapshot)
/// for export and built in memory by the import path before the store is
/// replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub species: Vec<Species>,
    pub specimens: Vec<Specimen>,
    pub updates: Vec<Update>,
    pub measurements: Vec<Measurement>,
    pub photos: Vec<Photo>,
    pub notifications: Vec<Notification>,
    pub graveyard_entries: Vec<GraveyardEntry>,
    pub accolades: Vec<Accolade>,
}

/// Row counts per kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetCounts {
    pub species: usize,
    pub specimens: usize,
    pub updates: usize,
    pub measurements: usize,
    pub photos: usize,
    pub notifications: usize,
    pub graveyard_entries: usize,
    pub accolades: usize,
}

impl Dataset {
    #[must_use]
    pub fn counts(&self) -> DatasetCounts {
        DatasetCounts {
            species: self.species.len(),
            specimens: self.specimens.len(),
            updates: self.updates.len(),
            measurements: self.measurements.len(),
            photos: self.photos.len(),
            notifications: self.notifications.len(),
            graveyard_entries: self.graveyard_entries.len(),
            accolades: self.accolades.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts() == DatasetCounts::default()
    }

    /// Sort every collection by identifier.
    ///
    /// Stores return rows in id order; the import path assembles rows in
    /// archive order. Normalizing makes the two comparable.
    pub fn sort_by_id(&mut self) {
        self.species.sort_by_key(|r| r.id);
        self.specimens.sort_by_key(|r| r.id);
        self.updates.sort_by_key(|r| r.id);
        self.measurements.sort_by_key(|r| r.id);
        self.photos.sort_by_key(|r| r.id);
        self.notifications.sort_by_key(|r| r.id);
        self.graveyard_entries.sort_by_key(|r| r.id);
        self.accolades.sort_by_key(|r| r.id);
    }

    /// Species by id.
    #[must_use]
    pub fn species_index(&self) -> HashMap<i64, &Species> {
        self.species.iter().map(|s| (s.id, s)).collect()
    }

    /// Notifications not attached to any specimen.
    pub fn general_notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| n.specimen_id.is_none())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn notification(id: i64, specimen_id: Option<i64>) -> Notification {
        Notification {
            id,
            specimen_id,
            title: format!("n{id}"),
            message: String::new(),
            category: None,
            due_at: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn default_dataset_is_empty() {
        assert!(Dataset::default().is_empty());
    }

    #[test]
    fn general_notifications_excludes_attached() {
        let dataset = Dataset {
            notifications: vec![notification(1, Some(4)), notification(2, None)],
            ..Dataset::default()
        };
        let ids: Vec<i64> = dataset.general_notifications().map(|n| n.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.counts().notifications, 2);
    }

    #[test]
    fn sort_by_id_orders_each_collection() {
        let mut dataset = Dataset {
            notifications: vec![notification(9, None), notification(3, None)],
            ..Dataset::default()
        };
        dataset.sort_by_id();
        assert_eq!(dataset.notifications[0].id, 3);
    }
}
