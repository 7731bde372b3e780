//! Lending and digitization.
//!
//! Every action is gated on the item's capabilities. A refusal is an
//! ordinary [`CirculationOutcome`]; only storage failures are errors.

use std::fmt;

use folio_model::{CatalogItem, Capability, ItemId, NewItem};
use tracing::{debug, instrument};

use crate::database::{ItemRepository, StorageResult};

pub const DIGITAL_COPY_PREFIX: &str = "Digital copy: ";
pub const DIGITAL_COPY_DISK_TYPE: &str = "CD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CirculationAction {
    TakeHome,
    ReadInLibrary,
    Return,
    Digitize,
}

impl CirculationAction {
    /// Capability the item kind must have, if any.
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            CirculationAction::TakeHome => Some(Capability::TakeHome),
            CirculationAction::ReadInLibrary => Some(Capability::ReadInLibrary),
            CirculationAction::Digitize => Some(Capability::Digitize),
            CirculationAction::Return => None,
        }
    }
}

impl fmt::Display for CirculationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CirculationAction::TakeHome => "take home",
            CirculationAction::ReadInLibrary => "read in the library",
            CirculationAction::Return => "return",
            CirculationAction::Digitize => "digitize",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CirculationOutcome {
    /// The item was lent out and is now unavailable.
    Lent {
        item: CatalogItem,
        action: CirculationAction,
    },
    Returned {
        item: CatalogItem,
    },
    Digitized {
        source: CatalogItem,
        copy_id: ItemId,
        copy_name: String,
    },
    NotFound(ItemId),
    NotSupported {
        item: CatalogItem,
        action: CirculationAction,
    },
    /// Already lent out.
    Unavailable {
        item: CatalogItem,
    },
    /// Returning an item that was never lent out.
    NotLent {
        item: CatalogItem,
    },
}

impl CirculationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CirculationOutcome::Lent { .. }
                | CirculationOutcome::Returned { .. }
                | CirculationOutcome::Digitized { .. }
        )
    }

    /// Text for a notice.
    pub fn message(&self) -> String {
        match self {
            CirculationOutcome::Lent {
                item,
                action: CirculationAction::TakeHome,
            } => format!("{} taken home", item.short_info()),
            CirculationOutcome::Lent { item, .. } => {
                format!("{} is being read in the library", item.short_info())
            }
            CirculationOutcome::Returned { item } => {
                format!("{} returned", item.short_info())
            }
            CirculationOutcome::Digitized {
                copy_id, copy_name, ..
            } => format!("{copy_name} (id {copy_id}) added"),
            CirculationOutcome::NotFound(id) => format!("No item with id {id}"),
            CirculationOutcome::NotSupported { item, action } => {
                format!("A {} cannot be used to {action}", item.kind())
            }
            CirculationOutcome::Unavailable { item } => {
                format!("{} is not available right now", item.short_info())
            }
            CirculationOutcome::NotLent { item } => {
                format!("{} is already in the library", item.short_info())
            }
        }
    }
}

pub async fn take_home(
    repo: &dyn ItemRepository,
    id: ItemId,
) -> StorageResult<CirculationOutcome> {
    lend(repo, id, CirculationAction::TakeHome).await
}

pub async fn read_in_library(
    repo: &dyn ItemRepository,
    id: ItemId,
) -> StorageResult<CirculationOutcome> {
    lend(repo, id, CirculationAction::ReadInLibrary).await
}

#[instrument(skip(repo), level = "debug")]
async fn lend(
    repo: &dyn ItemRepository,
    id: ItemId,
    action: CirculationAction,
) -> StorageResult<CirculationOutcome> {
    let Some(item) = repo.get(id).await? else {
        return Ok(CirculationOutcome::NotFound(id));
    };
    if let Some(capability) = action.required_capability()
        && !item.can(capability)
    {
        return Ok(CirculationOutcome::NotSupported { item, action });
    }
    if !item.available {
        return Ok(CirculationOutcome::Unavailable { item });
    }

    if !repo.set_available(id, false).await? {
        return Ok(CirculationOutcome::NotFound(id));
    }
    debug!(%id, %action, "item lent");
    Ok(CirculationOutcome::Lent {
        item: CatalogItem {
            available: false,
            ..item
        },
        action,
    })
}

#[instrument(skip(repo), level = "debug")]
pub async fn return_item(
    repo: &dyn ItemRepository,
    id: ItemId,
) -> StorageResult<CirculationOutcome> {
    let Some(item) = repo.get(id).await? else {
        return Ok(CirculationOutcome::NotFound(id));
    };
    if item.available {
        return Ok(CirculationOutcome::NotLent { item });
    }
    if !repo.set_available(id, true).await? {
        return Ok(CirculationOutcome::NotFound(id));
    }
    Ok(CirculationOutcome::Returned {
        item: CatalogItem {
            available: true,
            ..item
        },
    })
}

/// Store a new available CD holding a digital copy of a book or newspaper.
#[instrument(skip(repo), level = "debug")]
pub async fn digitize(
    repo: &dyn ItemRepository,
    id: ItemId,
) -> StorageResult<CirculationOutcome> {
    let Some(source) = repo.get(id).await? else {
        return Ok(CirculationOutcome::NotFound(id));
    };
    if !source.can(Capability::Digitize) {
        return Ok(CirculationOutcome::NotSupported {
            item: source,
            action: CirculationAction::Digitize,
        });
    }

    let copy_name = format!("{DIGITAL_COPY_PREFIX}{}", source.name);
    let copy_id = repo
        .add(NewItem::disk(copy_name.clone(), DIGITAL_COPY_DISK_TYPE))
        .await?;
    debug!(%id, %copy_id, "digital copy stored");
    Ok(CirculationOutcome::Digitized {
        source,
        copy_id,
        copy_name,
    })
}
