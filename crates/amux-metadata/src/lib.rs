//! Durable per-workspace metadata store: `Save`, `Load` with legacy
//! filename fallback and corruption recovery, and `Delete`.

mod errors;
mod store;

pub use errors::MetadataError;
pub use store::{delete, load, save};
