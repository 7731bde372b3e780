use folio_model::CatalogItem;

/// Contiguous slice of the sorted catalog currently held in memory.
///
/// `offset + items.len() <= total_count` holds after every load performed
/// against an unchanged store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub items: Vec<CatalogItem>,
    pub total_count: usize,
}

/// One store read needed to extend a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

/// End of the window a load extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Before,
    After,
}

impl Window {
    pub fn new(offset: usize, items: Vec<CatalogItem>, total_count: usize) -> Self {
        Self {
            offset,
            items,
            total_count,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index one past the last loaded item.
    pub fn end(&self) -> usize {
        self.offset + self.items.len()
    }

    pub fn at_start(&self) -> bool {
        self.offset == 0
    }

    pub fn reaches_end(&self) -> bool {
        self.end() >= self.total_count
    }

    /// Read needed to grow the window at its head, if any.
    pub fn request_before(&self, load_more: usize) -> Option<PageRequest> {
        let limit = load_more.min(self.offset);
        (limit > 0).then(|| PageRequest {
            offset: self.offset - limit,
            limit,
        })
    }

    /// Read needed to grow the window at its tail, if any.
    pub fn request_after(&self, load_more: usize) -> Option<PageRequest> {
        let next = self.end();
        let limit = load_more.min(self.total_count.saturating_sub(next));
        (limit > 0).then_some(PageRequest {
            offset: next,
            limit,
        })
    }

    /// Prepend `fetched`, the rows directly before the window, and trim the
    /// tail back to `page_size`. The offset moves back by exactly the number
    /// of rows received, so a short read still leaves the window anchored at
    /// its old first row.
    pub fn prepend(&mut self, fetched: Vec<CatalogItem>, page_size: usize) {
        if fetched.is_empty() {
            return;
        }
        let new_offset = self.offset.saturating_sub(fetched.len());
        let trim = overflow(self.items.len(), fetched.len(), page_size);
        self.items.truncate(self.items.len() - trim);
        let mut items = fetched;
        items.append(&mut self.items);
        self.items = items;
        self.offset = new_offset;
    }

    /// Append `fetched` and trim the head back to `page_size`; the offset
    /// advances by the number of trimmed items.
    pub fn append(&mut self, mut fetched: Vec<CatalogItem>, page_size: usize) {
        if fetched.is_empty() {
            return;
        }
        let trim = overflow(self.items.len(), fetched.len(), page_size);
        self.items.drain(..trim);
        self.items.append(&mut fetched);
        self.offset += trim;
    }
}

/// Items to drop from the opposite end, never more than were fetched.
fn overflow(current: usize, fetched: usize, page_size: usize) -> usize {
    fetched.min((current + fetched).saturating_sub(page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use folio_model::{ItemId, NewItem};

    fn items(range: std::ops::Range<i64>) -> Vec<CatalogItem> {
        range
            .map(|i| {
                NewItem::disk(format!("disk {i}"), "CD")
                    .into_stored(ItemId(i), DateTime::<Utc>::from_timestamp(i, 0).unwrap())
            })
            .collect()
    }

    fn ids(window: &Window) -> Vec<i64> {
        window.items.iter().map(|item| item.id.as_i64()).collect()
    }

    #[test]
    fn append_trims_head_and_advances_offset() {
        let mut window = Window::new(0, items(0..30), 100);
        let request = window.request_after(8).unwrap();
        assert_eq!(request, PageRequest { offset: 30, limit: 8 });

        window.append(items(30..38), 30);
        assert_eq!(window.offset, 8);
        assert_eq!(window.len(), 30);
        assert_eq!(ids(&window), (8..38).collect::<Vec<_>>());
    }

    #[test]
    fn append_below_page_size_keeps_everything() {
        let mut window = Window::new(0, items(0..10), 15);
        let request = window.request_after(8).unwrap();
        assert_eq!(request.limit, 5);
        window.append(items(10..15), 30);
        assert_eq!(window.offset, 0);
        assert_eq!(window.len(), 15);
        assert!(window.reaches_end());
        assert_eq!(window.request_after(8), None);
    }

    #[test]
    fn prepend_trims_tail() {
        let mut window = Window::new(8, items(8..38), 100);
        let request = window.request_before(8).unwrap();
        assert_eq!(request, PageRequest { offset: 0, limit: 8 });

        window.prepend(items(0..8), 30);
        assert_eq!(window.offset, request.offset);
        assert_eq!(ids(&window), (0..30).collect::<Vec<_>>());
        assert_eq!(window.request_before(8), None);
    }

    #[test]
    fn prepend_is_limited_by_offset() {
        let window = Window::new(3, items(3..33), 100);
        assert_eq!(
            window.request_before(8),
            Some(PageRequest { offset: 0, limit: 3 })
        );
    }

    #[test]
    fn short_prepend_moves_offset_by_rows_received() {
        let mut window = Window::new(8, items(8..38), 100);
        // the store returned 5 of the 8 rows asked for
        window.prepend(items(3..8), 30);
        assert_eq!(window.offset, 3);
        assert_eq!(window.len(), 30);
        assert_eq!(ids(&window), (3..33).collect::<Vec<_>>());
        assert!(window.offset + window.len() <= window.total_count);
    }

    #[test]
    fn empty_fetch_leaves_window_alone() {
        let mut window = Window::new(5, items(5..10), 10);
        let before = window.clone();
        window.append(Vec::new(), 30);
        window.prepend(Vec::new(), 30);
        assert_eq!(window, before);
    }
}
