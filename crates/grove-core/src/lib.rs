//! # grove-core
//!
//! Core types shared across all Grove crates:
//! - Entity structs for every managed record kind (species, specimens,
//!   updates, measurements, photos, notifications, graveyard entries, accolades)
//! - Entity-kind and media-variant enums
//! - The [`Dataset`](dataset::Dataset) snapshot exchanged by the backup engine
//! - The [`DatasetStore`](store::DatasetStore) collaborator trait
//! - Report types returned by store and engine operations
//! - ISO-8601 text helpers shared by the store and the archive codec

pub mod dataset;
pub mod entities;
pub mod enums;
pub mod responses;
pub mod store;
pub mod time;
