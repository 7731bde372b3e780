//! Snapshot of the model surface for consumers that want everything at once.

pub use super::capability::{Capabilities, Capability};
pub use super::ids::ItemId;
pub use super::item::{CatalogItem, ItemDetails, ItemKind, NewItem};
pub use super::month::Month;
pub use super::remote::RemoteBook;
pub use super::sort::{SortField, SortOrder, SortPreference};
