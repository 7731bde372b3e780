//! Item store: the repository port, its adapters and the row mapping.

pub mod entity;
pub mod memory;
pub mod repository_ports;
#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub mod sqlite;

pub use entity::LibraryItemEntity;
pub use memory::InMemoryItemRepository;
pub use repository_ports::{DuplicateKey, ItemRepository};
#[cfg(feature = "database")]
pub use sqlite::SqliteItemRepository;

pub type StorageResult<T> = std::result::Result<T, crate::error::StorageError>;
