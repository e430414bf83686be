//! Entity structs for every record kind managed by Grove.

mod accolade;
mod graveyard;
mod measurement;
mod notification;
mod photo;
mod species;
mod specimen;
mod update;

pub use accolade::Accolade;
pub use graveyard::GraveyardEntry;
pub use measurement::Measurement;
pub use notification::Notification;
pub use photo::Photo;
pub use species::Species;
pub use specimen::Specimen;
pub use update::Update;
