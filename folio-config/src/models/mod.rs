pub mod sources;

use std::path::{Path, PathBuf};
use std::time::Duration;

use folio_core::pagination::PaginationConfig;
use folio_core::providers::GoogleBooksConfig;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://folio.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PREFERENCES_DIR: &str = ".folio";
pub const DEFAULT_PREFERENCES_NAMESPACE: &str = "folio";

#[derive(Debug, Default, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub pagination: PaginationSettings,
    pub search: SearchSettings,
    pub preferences: PreferencesConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.preferences.dir)?;
        Ok(())
    }

    pub fn preferences_dir(&self) -> &Path {
        &self.preferences.dir
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSettings {
    pub page_size: usize,
    pub load_more_count: usize,
    pub prefetch_distance: usize,
    pub load_timeout: Duration,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        let core = PaginationConfig::default();
        Self {
            page_size: core.page_size,
            load_more_count: core.load_more_count,
            prefetch_distance: core.prefetch_distance,
            load_timeout: core.load_timeout,
        }
    }
}

impl From<&PaginationSettings> for PaginationConfig {
    fn from(settings: &PaginationSettings) -> Self {
        PaginationConfig {
            page_size: settings.page_size,
            load_more_count: settings.load_more_count,
            prefetch_distance: settings.prefetch_distance,
            load_timeout: settings.load_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_results: u32,
    pub timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let core = GoogleBooksConfig::default();
        Self {
            base_url: core.base_url,
            api_key: core.api_key,
            max_results: core.max_results,
            timeout: core.timeout,
        }
    }
}

impl From<&SearchSettings> for GoogleBooksConfig {
    fn from(settings: &SearchSettings) -> Self {
        GoogleBooksConfig {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            max_results: settings.max_results,
            timeout: settings.timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesConfig {
    pub dir: PathBuf,
    pub namespace: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_PREFERENCES_DIR),
            namespace: DEFAULT_PREFERENCES_NAMESPACE.to_string(),
        }
    }
}

/// Where the effective values came from.
#[derive(Debug, Default, Clone)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
