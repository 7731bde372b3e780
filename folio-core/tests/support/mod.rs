//! Shared fixtures for core integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use folio_core::database::{DuplicateKey, InMemoryItemRepository, ItemRepository, StorageResult};
use folio_core::error::StorageError;
use folio_model::{CatalogItem, ItemId, NewItem, SortPreference};

/// `count` books named `Book 000`, `Book 001`, ... inserted in that order.
pub fn books(count: usize) -> Vec<NewItem> {
    (0..count)
        .map(|i| NewItem::book(format!("Book {i:03}"), 100 + i as u32, "Test Author"))
        .collect()
}

pub async fn memory_repo(count: usize) -> Arc<InMemoryItemRepository> {
    let repo = Arc::new(InMemoryItemRepository::new());
    repo.insert_all(books(count))
        .await
        .expect("seed in-memory repository");
    repo
}

/// Delegates to an in-memory store; page reads can be made to fail or stall.
#[derive(Default)]
pub struct FlakyRepository {
    pub inner: InMemoryItemRepository,
    fail_pages: AtomicBool,
    stall_pages: AtomicBool,
}

impl FlakyRepository {
    pub async fn with_items(count: usize) -> Arc<Self> {
        let repo = Self::default();
        repo.inner
            .insert_all(books(count))
            .await
            .expect("seed flaky repository");
        Arc::new(repo)
    }

    pub fn fail_pages(&self, fail: bool) {
        self.fail_pages.store(fail, Ordering::SeqCst);
    }

    pub fn stall_pages(&self, stall: bool) {
        self.stall_pages.store(stall, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemRepository for FlakyRepository {
    async fn page(
        &self,
        limit: usize,
        offset: usize,
        sort: SortPreference,
    ) -> StorageResult<Vec<CatalogItem>> {
        if self.stall_pages.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk unplugged")));
        }
        self.inner.page(limit, offset, sort).await
    }

    async fn total_count(&self) -> StorageResult<usize> {
        self.inner.total_count().await
    }

    async fn add_with_isbn(&self, item: NewItem, isbn: Option<String>) -> StorageResult<ItemId> {
        self.inner.add_with_isbn(item, isbn).await
    }

    async fn remove(&self, id: ItemId) -> StorageResult<bool> {
        self.inner.remove(id).await
    }

    async fn get(&self, id: ItemId) -> StorageResult<Option<CatalogItem>> {
        self.inner.get(id).await
    }

    async fn find_duplicate(&self, key: &DuplicateKey) -> StorageResult<Option<CatalogItem>> {
        self.inner.find_duplicate(key).await
    }

    async fn set_available(&self, id: ItemId, available: bool) -> StorageResult<bool> {
        self.inner.set_available(id, available).await
    }

    async fn clear(&self) -> StorageResult<()> {
        self.inner.clear().await
    }

    async fn insert_all(&self, items: Vec<NewItem>) -> StorageResult<Vec<ItemId>> {
        self.inner.insert_all(items).await
    }
}

pub fn ids(items: &[CatalogItem]) -> Vec<i64> {
    items.iter().map(|item| item.id.as_i64()).collect()
}
