use std::fmt;

use folio_model::SortPreference;

use super::window::Window;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaginationState {
    #[default]
    Idle,
    LoadingInitial,
    LoadingBefore,
    LoadingAfter,
    /// The last initial load failed; holds the user-facing message.
    Error(String),
}

impl PaginationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PaginationState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            PaginationState::LoadingInitial
                | PaginationState::LoadingBefore
                | PaginationState::LoadingAfter
        )
    }
}

/// Everything an observer needs to render the list, published as one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationSnapshot {
    pub window: Window,
    pub state: PaginationState,
    pub sort: SortPreference,
    /// Bumped by every initial load. Results of older loads are discarded.
    pub generation: u64,
}

impl PaginationSnapshot {
    pub fn new(sort: SortPreference) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-shot message for the user. Not replayed to late subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// How a spawned load ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { fetched: usize },
    Failed(String),
    /// Cancelled or overtaken by a newer initial load; nothing was applied.
    Superseded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_neither_idle_nor_loading() {
        let error = PaginationState::Error("offline".into());
        assert!(!error.is_idle());
        assert!(!error.is_loading());

        assert!(PaginationState::Idle.is_idle());
        for state in [
            PaginationState::LoadingInitial,
            PaginationState::LoadingBefore,
            PaginationState::LoadingAfter,
        ] {
            assert!(state.is_loading(), "{state:?}");
            assert!(!state.is_idle(), "{state:?}");
        }
    }
}
