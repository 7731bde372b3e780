//! In-memory item store: a plain list behind a lock.
//!
//! Identifiers come from a counter owned by the store and are never handed
//! out twice, even after deletes.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use folio_model::{
    CatalogItem, ItemDetails, ItemId, NewItem, SortField, SortOrder, SortPreference,
};
use tokio::sync::RwLock;

use crate::database::StorageResult;
use crate::database::repository_ports::{DuplicateKey, ItemRepository};
use crate::error::StorageError;

#[derive(Debug, Default)]
struct MemoryState {
    items: Vec<CatalogItem>,
    isbns: HashMap<ItemId, String>,
    last_id: i64,
}

impl MemoryState {
    fn insert(&mut self, item: NewItem, isbn: Option<String>) -> StorageResult<ItemId> {
        let isbn = isbn.filter(|_| matches!(item.details, ItemDetails::Book { .. }));
        if let Some(isbn) = &isbn
            && self.isbns.values().any(|existing| existing == isbn)
        {
            return Err(StorageError::Constraint(format!(
                "UNIQUE constraint failed: library_items.isbn ({isbn})"
            )));
        }

        self.last_id += 1;
        let id = ItemId(self.last_id);
        self.items.push(item.into_stored(id, Utc::now()));
        if let Some(isbn) = isbn {
            self.isbns.insert(id, isbn);
        }
        Ok(id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn compare(sort: SortPreference, a: &CatalogItem, b: &CatalogItem) -> Ordering {
        let primary = match sort.field {
            // Same as SQLite NOCASE: ASCII folding only, then byte order.
            SortField::Name => a
                .name
                .to_ascii_lowercase()
                .cmp(&b.name.to_ascii_lowercase()),
            SortField::DateAdded => a.date_added.cmp(&b.date_added),
        };
        let ordering = primary.then_with(|| a.id.cmp(&b.id));
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn page(
        &self,
        limit: usize,
        offset: usize,
        sort: SortPreference,
    ) -> StorageResult<Vec<CatalogItem>> {
        let state = self.state.read().await;
        let mut sorted: Vec<&CatalogItem> = state.items.iter().collect();
        sorted.sort_by(|a, b| Self::compare(sort, a, b));
        Ok(sorted
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn total_count(&self) -> StorageResult<usize> {
        Ok(self.state.read().await.items.len())
    }

    async fn add_with_isbn(
        &self,
        item: NewItem,
        isbn: Option<String>,
    ) -> StorageResult<ItemId> {
        self.state.write().await.insert(item, isbn)
    }

    async fn remove(&self, id: ItemId) -> StorageResult<bool> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|item| item.id != id);
        state.isbns.remove(&id);
        Ok(state.items.len() != before)
    }

    async fn get(&self, id: ItemId) -> StorageResult<Option<CatalogItem>> {
        let state = self.state.read().await;
        Ok(state.items.iter().find(|item| item.id == id).cloned())
    }

    async fn find_duplicate(
        &self,
        key: &DuplicateKey,
    ) -> StorageResult<Option<CatalogItem>> {
        let state = self.state.read().await;
        let found = match key {
            DuplicateKey::Isbn(isbn) => state
                .isbns
                .iter()
                .filter(|(_, stored)| *stored == isbn)
                .map(|(id, _)| *id)
                .min()
                .and_then(|id| state.items.iter().find(|item| item.id == id)),
            DuplicateKey::NameAndAuthor { name, author } => {
                state.items.iter().find(|item| {
                    item.name == *name
                        && matches!(
                            &item.details,
                            ItemDetails::Book { author: stored, .. } if stored == author
                        )
                })
            }
        };
        Ok(found.cloned())
    }

    async fn set_available(&self, id: ItemId, available: bool) -> StorageResult<bool> {
        let mut state = self.state.write().await;
        match state.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.available = available;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.items.clear();
        state.isbns.clear();
        Ok(())
    }

    async fn insert_all(&self, items: Vec<NewItem>) -> StorageResult<Vec<ItemId>> {
        let mut state = self.state.write().await;
        items
            .into_iter()
            .map(|item| state.insert(item, None))
            .collect()
    }
}
