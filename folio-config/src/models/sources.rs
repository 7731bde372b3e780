use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::util::{EnvLookup, duration_var, non_blank_var, parse_var, path_var};

pub const ENV_CONFIG_PATH: &str = "FOLIO_CONFIG_PATH";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const ENV_PAGE_SIZE: &str = "FOLIO_PAGE_SIZE";
pub const ENV_LOAD_MORE_COUNT: &str = "FOLIO_LOAD_MORE_COUNT";
pub const ENV_PREFETCH_DISTANCE: &str = "FOLIO_PREFETCH_DISTANCE";
pub const ENV_LOAD_TIMEOUT: &str = "FOLIO_LOAD_TIMEOUT";
pub const ENV_SEARCH_BASE_URL: &str = "GOOGLE_BOOKS_BASE_URL";
pub const ENV_SEARCH_API_KEY: &str = "GOOGLE_BOOKS_API_KEY";
pub const ENV_SEARCH_MAX_RESULTS: &str = "GOOGLE_BOOKS_MAX_RESULTS";
pub const ENV_SEARCH_TIMEOUT: &str = "GOOGLE_BOOKS_TIMEOUT";
pub const ENV_PREFERENCES_DIR: &str = "FOLIO_PREFERENCES_DIR";
pub const ENV_PREFERENCES_NAMESPACE: &str = "FOLIO_PREFERENCES_NAMESPACE";

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub pagination: FilePaginationConfig,
    #[serde(default)]
    pub search: FileSearchConfig,
    #[serde(default)]
    pub preferences: FilePreferencesConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePaginationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_more_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefetch_distance: Option<usize>,
    /// Humantime string, e.g. `"10s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileSearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePreferencesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub page_size: Option<usize>,
    pub load_more_count: Option<usize>,
    pub prefetch_distance: Option<usize>,
    pub load_timeout: Option<Duration>,
    pub search_base_url: Option<String>,
    pub search_api_key: Option<String>,
    pub search_max_results: Option<u32>,
    pub search_timeout: Option<Duration>,
    pub preferences_dir: Option<PathBuf>,
    pub preferences_namespace: Option<String>,
}

impl EnvConfig {
    pub fn gather(env: &impl EnvLookup) -> Self {
        Self {
            config_path: path_var(env, ENV_CONFIG_PATH),
            database_url: non_blank_var(env, ENV_DATABASE_URL),
            database_max_connections: parse_var(env, ENV_DATABASE_MAX_CONNECTIONS),
            page_size: parse_var(env, ENV_PAGE_SIZE),
            load_more_count: parse_var(env, ENV_LOAD_MORE_COUNT),
            prefetch_distance: parse_var(env, ENV_PREFETCH_DISTANCE),
            load_timeout: duration_var(env, ENV_LOAD_TIMEOUT),
            search_base_url: non_blank_var(env, ENV_SEARCH_BASE_URL),
            search_api_key: non_blank_var(env, ENV_SEARCH_API_KEY),
            search_max_results: parse_var(env, ENV_SEARCH_MAX_RESULTS),
            search_timeout: duration_var(env, ENV_SEARCH_TIMEOUT),
            preferences_dir: path_var(env, ENV_PREFERENCES_DIR),
            preferences_namespace: non_blank_var(env, ENV_PREFERENCES_NAMESPACE),
        }
    }
}
