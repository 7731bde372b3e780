use crate::item::NewItem;

/// A volume returned by the remote book search, normalized for display and
/// optional import into the local catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteBook {
    pub volume_id: String,
    /// Hyphen-free ISBN-13 when known, otherwise ISBN-10.
    pub isbn: Option<String>,
    pub title: String,
    /// Authors joined with `", "`.
    pub authors: String,
    pub page_count: u32,
}

impl RemoteBook {
    /// The local catalog entry this volume becomes on import.
    pub fn to_new_item(&self) -> NewItem {
        NewItem::book(self.title.clone(), self.page_count, self.authors.clone())
    }
}
