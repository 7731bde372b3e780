//! Renderable rows for the catalog list.
//!
//! A projection is the window's items framed by loading markers, and
//! [`diff`] turns two consecutive projections into the smallest set of row
//! removals, insertions and in-place updates a list widget has to perform.

mod diff;

pub use diff::{Payload, RowChange, RowDiff, diff};

use folio_model::{CatalogItem, ItemId};

use crate::pagination::{PaginationSnapshot, PaginationState, Window};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    LoadingTop,
    Item(CatalogItem),
    LoadingBottom,
}

/// Identity of a row across projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    LoadingTop,
    Item(ItemId),
    LoadingBottom,
}

impl Row {
    pub fn key(&self) -> RowKey {
        match self {
            Row::LoadingTop => RowKey::LoadingTop,
            Row::Item(item) => RowKey::Item(item.id),
            Row::LoadingBottom => RowKey::LoadingBottom,
        }
    }

    pub fn item(&self) -> Option<&CatalogItem> {
        match self {
            Row::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_marker(&self) -> bool {
        !matches!(self, Row::Item(_))
    }
}

/// `[LoadingTop?] ++ items ++ [LoadingBottom?]`.
pub fn project(window: &Window, state: &PaginationState) -> Vec<Row> {
    let top = matches!(state, PaginationState::LoadingBefore);
    let bottom = matches!(state, PaginationState::LoadingAfter);

    let mut rows = Vec::with_capacity(window.len() + usize::from(top) + usize::from(bottom));
    if top {
        rows.push(Row::LoadingTop);
    }
    rows.extend(window.items.iter().cloned().map(Row::Item));
    if bottom {
        rows.push(Row::LoadingBottom);
    }
    rows
}

pub fn project_snapshot(snapshot: &PaginationSnapshot) -> Vec<Row> {
    project(&snapshot.window, &snapshot.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_model::NewItem;

    fn window() -> Window {
        let now = Utc::now();
        Window::new(
            4,
            vec![
                NewItem::book("A", 1, "x").into_stored(ItemId(5), now),
                NewItem::disk("B", "CD").into_stored(ItemId(6), now),
            ],
            20,
        )
    }

    fn keys(rows: &[Row]) -> Vec<RowKey> {
        rows.iter().map(Row::key).collect()
    }

    #[test]
    fn idle_projection_is_just_items() {
        let rows = project(&window(), &PaginationState::Idle);
        assert_eq!(keys(&rows), [RowKey::Item(ItemId(5)), RowKey::Item(ItemId(6))]);
    }

    #[test]
    fn markers_follow_loading_direction() {
        let rows = project(&window(), &PaginationState::LoadingBefore);
        assert_eq!(rows.first(), Some(&Row::LoadingTop));
        assert_eq!(rows.len(), 3);

        let rows = project(&window(), &PaginationState::LoadingAfter);
        assert_eq!(rows.last(), Some(&Row::LoadingBottom));
        assert!(!rows.contains(&Row::LoadingTop));
    }

    #[test]
    fn initial_loading_and_error_have_no_markers() {
        for state in [
            PaginationState::LoadingInitial,
            PaginationState::Error("boom".into()),
        ] {
            let rows = project(&window(), &state);
            assert!(rows.iter().all(|row| !row.is_marker()));
        }
    }
}
