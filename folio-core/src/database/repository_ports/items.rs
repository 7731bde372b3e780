use async_trait::async_trait;
use folio_model::{CatalogItem, ItemId, NewItem, SortPreference};

use crate::database::StorageResult;

/// Lookup key used to detect an already-catalogued book on import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateKey {
    /// Hyphen-free ISBN as stored on imported books.
    Isbn(String),
    /// Exact title and formatted author list of a book.
    NameAndAuthor { name: String, author: String },
}

/// Repository port for catalog items.
///
/// Implementations serialize access internally so concurrent calls are
/// linearizable, and every mutation is durable once the call returns.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Up to `limit` items starting at `offset` in `sort` order.
    ///
    /// Returns fewer than `limit` near the end and nothing when `offset` is
    /// past the last item.
    async fn page(
        &self,
        limit: usize,
        offset: usize,
        sort: SortPreference,
    ) -> StorageResult<Vec<CatalogItem>>;

    /// Current number of stored items.
    async fn total_count(&self) -> StorageResult<usize>;

    /// Store a new item, stamping it with a fresh id and the current time.
    async fn add(&self, item: NewItem) -> StorageResult<ItemId> {
        self.add_with_isbn(item, None).await
    }

    /// Store a new item together with an external ISBN (book imports).
    async fn add_with_isbn(
        &self,
        item: NewItem,
        isbn: Option<String>,
    ) -> StorageResult<ItemId>;

    /// Delete by id. `false` when no such item exists.
    async fn remove(&self, id: ItemId) -> StorageResult<bool>;

    async fn get(&self, id: ItemId) -> StorageResult<Option<CatalogItem>>;

    /// Find a stored book matching `key`.
    async fn find_duplicate(
        &self,
        key: &DuplicateKey,
    ) -> StorageResult<Option<CatalogItem>>;

    /// Flip the availability flag. `false` when no such item exists.
    async fn set_available(
        &self,
        id: ItemId,
        available: bool,
    ) -> StorageResult<bool>;

    /// Remove every item. Used when reseeding a catalog.
    async fn clear(&self) -> StorageResult<()>;

    /// Bulk insert, preserving input order in the assigned ids.
    async fn insert_all(&self, items: Vec<NewItem>) -> StorageResult<Vec<ItemId>>;
}
