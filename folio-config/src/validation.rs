use std::time::Duration;

use thiserror::Error;

use super::models::{Config, PaginationSettings, SearchSettings};

/// Timeouts below this are accepted but flagged.
pub const MIN_SENSIBLE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("pagination page size must be greater than zero")]
    ZeroPageSize,
    #[error("pagination load-more count must be greater than zero")]
    ZeroLoadMoreCount,
    #[error("load-more count {load_more_count} exceeds page size {page_size}")]
    LoadMoreExceedsPage {
        load_more_count: usize,
        page_size: usize,
    },
    #[error("database max connections must be greater than zero")]
    ZeroMaxConnections,
    #[error("search base URL '{url}' is not a valid http(s) URL")]
    InvalidSearchUrl { url: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.database.max_connections == 0 {
        return Err(ConfigGuardRailError::ZeroMaxConnections);
    }

    check_pagination(&config.pagination, &mut warnings)?;
    check_search(&config.search, &mut warnings)?;

    Ok(warnings)
}

fn check_pagination(
    pagination: &PaginationSettings,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    if pagination.page_size == 0 {
        return Err(ConfigGuardRailError::ZeroPageSize);
    }
    if pagination.load_more_count == 0 {
        return Err(ConfigGuardRailError::ZeroLoadMoreCount);
    }
    if pagination.load_more_count > pagination.page_size {
        return Err(ConfigGuardRailError::LoadMoreExceedsPage {
            load_more_count: pagination.load_more_count,
            page_size: pagination.page_size,
        });
    }

    if pagination.load_timeout < MIN_SENSIBLE_TIMEOUT {
        warnings.push_with_hint(
            format!(
                "pagination load timeout of {:?} is very short; loads may fail spuriously",
                pagination.load_timeout
            ),
            "Set FOLIO_LOAD_TIMEOUT to a value such as 10s",
        );
    }
    if pagination.prefetch_distance >= pagination.page_size {
        warnings.push(format!(
            "prefetch distance {} is not smaller than the page size {}; every scroll will trigger a load",
            pagination.prefetch_distance, pagination.page_size
        ));
    }
    Ok(())
}

fn check_search(
    search: &SearchSettings,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    match url::Url::parse(&search.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => {
            return Err(ConfigGuardRailError::InvalidSearchUrl {
                url: search.base_url.clone(),
            });
        }
    }

    if search.api_key.is_none() {
        warnings.push_with_hint(
            "GOOGLE_BOOKS_API_KEY not set; remote search uses the anonymous quota",
            "Set GOOGLE_BOOKS_API_KEY or add api_key to the [search] section",
        );
    }
    if search.timeout < MIN_SENSIBLE_TIMEOUT {
        warnings.push(format!(
            "search timeout of {:?} is very short; remote lookups may fail spuriously",
            search.timeout
        ));
    }
    Ok(())
}
