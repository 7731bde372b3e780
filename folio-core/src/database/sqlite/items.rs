use async_trait::async_trait;
use chrono::Utc;
use folio_model::{CatalogItem, ItemId, NewItem, SortField, SortOrder, SortPreference};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::database::entity::LibraryItemEntity;
use crate::database::repository_ports::{DuplicateKey, ItemRepository};
use crate::database::StorageResult;
use crate::error::StorageError;

const COLUMNS: &str = "id, available, name, type, date_added, isbn, pages, author, \
                       issue_number, month_display_name, disk_type";

#[derive(Clone, Debug)]
pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// ORDER BY clause for a sort preference. `id` breaks ties in the same
    /// direction so offsets stay stable between page reads.
    fn order_clause(sort: SortPreference) -> &'static str {
        match (sort.field, sort.order) {
            (SortField::Name, SortOrder::Asc) => "name COLLATE NOCASE ASC, id ASC",
            (SortField::Name, SortOrder::Desc) => "name COLLATE NOCASE DESC, id DESC",
            (SortField::DateAdded, SortOrder::Asc) => "date_added ASC, id ASC",
            (SortField::DateAdded, SortOrder::Desc) => "date_added DESC, id DESC",
        }
    }

    async fn insert_entity<'e, E>(executor: E, entity: &LibraryItemEntity) -> StorageResult<ItemId>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO library_items (
                available,
                name,
                type,
                date_added,
                isbn,
                pages,
                author,
                issue_number,
                month_display_name,
                disk_type
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entity.available)
        .bind(&entity.name)
        .bind(&entity.item_type)
        .bind(entity.date_added)
        .bind(&entity.isbn)
        .bind(entity.pages)
        .bind(&entity.author)
        .bind(entity.issue_number)
        .bind(&entity.month_display_name)
        .bind(&entity.disk_type)
        .execute(executor)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(ItemId(result.last_insert_rowid()))
    }

    fn decode(rows: Vec<LibraryItemEntity>) -> StorageResult<Vec<CatalogItem>> {
        rows.into_iter().map(LibraryItemEntity::into_item).collect()
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    #[instrument(skip(self), level = "debug")]
    async fn page(
        &self,
        limit: usize,
        offset: usize,
        sort: SortPreference,
    ) -> StorageResult<Vec<CatalogItem>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} FROM library_items ORDER BY {} LIMIT ? OFFSET ?",
            Self::order_clause(sort)
        );
        let rows = sqlx::query_as::<_, LibraryItemEntity>(&sql)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(self.pool())
            .await?;

        debug!(returned = rows.len(), "page read");
        Self::decode(rows)
    }

    async fn total_count(&self) -> StorageResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM library_items")
            .fetch_one(self.pool())
            .await?;
        Ok(count.max(0) as usize)
    }

    #[instrument(skip(self, item), fields(name = %item.name), level = "debug")]
    async fn add_with_isbn(
        &self,
        item: NewItem,
        isbn: Option<String>,
    ) -> StorageResult<ItemId> {
        let entity = LibraryItemEntity::from_new(&item, isbn, Utc::now());
        let id = Self::insert_entity(self.pool(), &entity).await?;
        debug!(%id, "item stored");
        Ok(id)
    }

    async fn remove(&self, id: ItemId) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM library_items WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: ItemId) -> StorageResult<Option<CatalogItem>> {
        let sql = format!("SELECT {COLUMNS} FROM library_items WHERE id = ?");
        let row = sqlx::query_as::<_, LibraryItemEntity>(&sql)
            .bind(id.as_i64())
            .fetch_optional(self.pool())
            .await?;
        row.map(LibraryItemEntity::into_item).transpose()
    }

    async fn find_duplicate(
        &self,
        key: &DuplicateKey,
    ) -> StorageResult<Option<CatalogItem>> {
        let row = match key {
            DuplicateKey::Isbn(isbn) => {
                let sql = format!("SELECT {COLUMNS} FROM library_items WHERE isbn = ? LIMIT 1");
                sqlx::query_as::<_, LibraryItemEntity>(&sql)
                    .bind(isbn)
                    .fetch_optional(self.pool())
                    .await?
            }
            DuplicateKey::NameAndAuthor { name, author } => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM library_items \
                     WHERE name = ? AND author = ? AND type = 'BOOK' \
                     ORDER BY id ASC LIMIT 1"
                );
                sqlx::query_as::<_, LibraryItemEntity>(&sql)
                    .bind(name)
                    .bind(author)
                    .fetch_optional(self.pool())
                    .await?
            }
        };
        row.map(LibraryItemEntity::into_item).transpose()
    }

    async fn set_available(&self, id: ItemId, available: bool) -> StorageResult<bool> {
        let result = sqlx::query("UPDATE library_items SET available = ? WHERE id = ?")
            .bind(available)
            .bind(id.as_i64())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> StorageResult<()> {
        sqlx::query("DELETE FROM library_items")
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn insert_all(&self, items: Vec<NewItem>) -> StorageResult<Vec<ItemId>> {
        let mut tx = self.pool().begin().await?;
        let mut ids = Vec::with_capacity(items.len());
        for item in &items {
            let entity = LibraryItemEntity::from_new(item, None, Utc::now());
            ids.push(Self::insert_entity(&mut *tx, &entity).await?);
        }
        tx.commit().await?;
        debug!(count = ids.len(), "bulk insert committed");
        Ok(ids)
    }
}
