//! User preferences.

pub mod sort;
pub mod store;

pub use sort::{SORT_FIELD_KEY, SORT_ORDER_KEY, SortPreferenceRepository};
pub use store::{InMemoryPreferenceStore, JsonFilePreferenceStore, PreferenceStore};
