use std::fmt::{self, Display};

use crate::capability::{Capabilities, Capability};
use crate::chrono::{DateTime, Utc};
use crate::error::ModelError;
use crate::ids::ItemId;
use crate::month::Month;

/// Discriminant of a catalog entry, matching the persisted `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ItemKind {
    Book,
    Newspaper,
    Disk,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Book => "BOOK",
            ItemKind::Newspaper => "NEWSPAPER",
            ItemKind::Disk => "DISK",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            ItemKind::Book => Capabilities::of(&[
                Capability::TakeHome,
                Capability::ReadInLibrary,
                Capability::Digitize,
            ]),
            ItemKind::Newspaper => Capabilities::of(&[
                Capability::ReadInLibrary,
                Capability::Digitize,
            ]),
            ItemKind::Disk => Capabilities::of(&[Capability::TakeHome]),
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Book => write!(f, "Book"),
            ItemKind::Newspaper => write!(f, "Newspaper"),
            ItemKind::Disk => write!(f, "Disk"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOK" => Ok(ItemKind::Book),
            "NEWSPAPER" => Ok(ItemKind::Newspaper),
            "DISK" => Ok(ItemKind::Disk),
            _ => Err(ModelError::UnknownKind(s.to_string())),
        }
    }
}

/// Variant-specific payload of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ItemDetails {
    Book { pages: u32, author: String },
    Newspaper { issue_number: u32, month: Month },
    Disk { disk_type: String },
}

impl ItemDetails {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemDetails::Book { .. } => ItemKind::Book,
            ItemDetails::Newspaper { .. } => ItemKind::Newspaper,
            ItemDetails::Disk { .. } => ItemKind::Disk,
        }
    }
}

/// A book, newspaper or disk that has been stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogItem {
    pub id: ItemId,
    pub available: bool,
    pub name: String,
    pub date_added: DateTime<Utc>,
    pub details: ItemDetails,
}

impl CatalogItem {
    pub fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind().capabilities()
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(capability)
    }

    /// Short label used in lists.
    pub fn short_info(&self) -> String {
        format!("{} (id {})", self.name, self.id)
    }

    /// One-line human readable description of the entry.
    pub fn detailed_info(&self) -> String {
        let availability = if self.available { "yes" } else { "no" };
        match &self.details {
            ItemDetails::Book { pages, author } => format!(
                "book: {} ({} pages) by {}, id {}, available: {}",
                self.name, pages, author, self.id, availability
            ),
            ItemDetails::Newspaper {
                issue_number,
                month,
            } => format!(
                "newspaper: {} issue {} ({}), id {}, available: {}",
                self.name, issue_number, month, self.id, availability
            ),
            ItemDetails::Disk { disk_type } => format!(
                "disk: {} {}, id {}, available: {}",
                disk_type, self.name, self.id, availability
            ),
        }
    }

    /// True when the only difference to `other` is the availability flag.
    pub fn differs_only_in_availability(&self, other: &CatalogItem) -> bool {
        self.available != other.available
            && self.id == other.id
            && self.name == other.name
            && self.date_added == other.date_added
            && self.details == other.details
    }
}

/// An entry that has not been stored yet.
///
/// The store assigns the identifier and the `date_added` timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewItem {
    pub available: bool,
    pub name: String,
    pub details: ItemDetails,
}

impl NewItem {
    pub fn book(name: impl Into<String>, pages: u32, author: impl Into<String>) -> Self {
        Self {
            available: true,
            name: name.into(),
            details: ItemDetails::Book {
                pages,
                author: author.into(),
            },
        }
    }

    pub fn newspaper(name: impl Into<String>, issue_number: u32, month: Month) -> Self {
        Self {
            available: true,
            name: name.into(),
            details: ItemDetails::Newspaper {
                issue_number,
                month,
            },
        }
    }

    pub fn disk(name: impl Into<String>, disk_type: impl Into<String>) -> Self {
        Self {
            available: true,
            name: name.into(),
            details: ItemDetails::Disk {
                disk_type: disk_type.into(),
            },
        }
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    /// Attach the store-assigned identity.
    pub fn into_stored(self, id: ItemId, date_added: DateTime<Utc>) -> CatalogItem {
        CatalogItem {
            id,
            available: self.available,
            name: self.name,
            date_added,
            details: self.details,
        }
    }
}
