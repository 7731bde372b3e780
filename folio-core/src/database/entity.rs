//! Flat row representation of a catalog item and the mapping to and from the
//! domain model.
//!
//! Every variant shares one table; columns that do not apply to a variant are
//! NULL. When a variant-specific column is missing on read, the mapping falls
//! back to a per-variant default instead of failing.

use chrono::{DateTime, Utc};
use folio_model::{CatalogItem, ItemDetails, ItemId, ItemKind, Month, NewItem};

use crate::error::StorageError;

pub const DEFAULT_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_DISK_TYPE: &str = "Unknown Type";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct LibraryItemEntity {
    pub id: i64,
    pub available: bool,
    pub name: String,
    #[cfg_attr(feature = "database", sqlx(rename = "type"))]
    pub item_type: String,
    /// Milliseconds since the Unix epoch.
    pub date_added: i64,
    pub isbn: Option<String>,
    pub pages: Option<i64>,
    pub author: Option<String>,
    pub issue_number: Option<i64>,
    pub month_display_name: Option<String>,
    pub disk_type: Option<String>,
}

impl LibraryItemEntity {
    /// Row for an item that has not been assigned an id yet (`id == 0`).
    pub fn from_new(item: &NewItem, isbn: Option<String>, date_added: DateTime<Utc>) -> Self {
        let mut entity = Self::blank(item.kind(), item.available, &item.name, date_added);
        entity.fill_details(&item.details);
        if matches!(item.details, ItemDetails::Book { .. }) {
            entity.isbn = isbn;
        }
        entity
    }

    pub fn from_item(item: &CatalogItem, isbn: Option<String>) -> Self {
        let mut entity = Self::blank(item.kind(), item.available, &item.name, item.date_added);
        entity.id = item.id.as_i64();
        entity.fill_details(&item.details);
        if matches!(item.details, ItemDetails::Book { .. }) {
            entity.isbn = isbn;
        }
        entity
    }

    fn blank(kind: ItemKind, available: bool, name: &str, date_added: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            available,
            name: name.to_string(),
            item_type: kind.as_str().to_string(),
            date_added: date_added.timestamp_millis(),
            isbn: None,
            pages: None,
            author: None,
            issue_number: None,
            month_display_name: None,
            disk_type: None,
        }
    }

    fn fill_details(&mut self, details: &ItemDetails) {
        match details {
            ItemDetails::Book { pages, author } => {
                self.pages = Some(i64::from(*pages));
                self.author = Some(author.clone());
            }
            ItemDetails::Newspaper {
                issue_number,
                month,
            } => {
                self.issue_number = Some(i64::from(*issue_number));
                self.month_display_name = Some(month.display_name().to_string());
            }
            ItemDetails::Disk { disk_type } => {
                self.disk_type = Some(disk_type.clone());
            }
        }
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.date_added).unwrap_or_default()
    }

    pub fn into_item(self) -> Result<CatalogItem, StorageError> {
        let kind = self
            .item_type
            .parse::<ItemKind>()
            .map_err(|err| StorageError::Corrupt {
                id: self.id,
                reason: err.to_string(),
            })?;
        let date_added = self.date_added();

        let details = match kind {
            ItemKind::Book => ItemDetails::Book {
                pages: self.pages.and_then(|p| u32::try_from(p).ok()).unwrap_or(0),
                author: self.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            },
            ItemKind::Newspaper => ItemDetails::Newspaper {
                issue_number: self
                    .issue_number
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(0),
                month: self
                    .month_display_name
                    .as_deref()
                    .and_then(Month::from_display_name)
                    .unwrap_or_else(Month::first),
            },
            ItemKind::Disk => ItemDetails::Disk {
                disk_type: self
                    .disk_type
                    .unwrap_or_else(|| DEFAULT_DISK_TYPE.to_string()),
            },
        };

        Ok(CatalogItem {
            id: ItemId(self.id),
            available: self.available,
            name: self.name,
            date_added,
            details,
        })
    }
}
