//! Sliding-window pagination over the item store.
//!
//! The controller keeps at most `page_size` items in memory. The window is
//! grown by `load_more_count` items at either end on demand and trimmed at
//! the opposite end, so scrolling through a large catalog never holds more
//! than one page.

mod controller;
mod state;
mod window;

use std::time::Duration;

pub use controller::{LoadHandle, PaginationController};
pub use state::{LoadOutcome, Notice, NoticeLevel, PaginationSnapshot, PaginationState};
pub use window::{Edge, PageRequest, Window};

pub const PAGE_SIZE: usize = 30;
pub const LOAD_MORE_COUNT: usize = 8;
pub const PREFETCH_DISTANCE: usize = 5;
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Notices buffered for slow subscribers before the oldest are dropped.
pub const NOTICE_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub page_size: usize,
    pub load_more_count: usize,
    pub prefetch_distance: usize,
    pub load_timeout: Duration,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            load_more_count: LOAD_MORE_COUNT,
            prefetch_distance: PREFETCH_DISTANCE,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}
