//! Core data model definitions shared across Folio crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod capability;
pub mod error;
pub mod ids;
pub mod item;
pub mod month;
pub mod prelude;
pub mod remote;
pub mod sort;

// Intentionally curated re-exports for downstream consumers.
pub use capability::{Capabilities, Capability};
pub use error::{ModelError, Result as ModelResult};
pub use ids::ItemId;
pub use item::{CatalogItem, ItemDetails, ItemKind, NewItem};
pub use month::Month;
pub use remote::RemoteBook;
pub use sort::{SortField, SortOrder, SortPreference};
