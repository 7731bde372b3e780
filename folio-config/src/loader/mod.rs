pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{
    Config, ConfigMetadata, DatabaseConfig, PaginationSettings, PreferencesConfig, SearchSettings,
};
use crate::util::{EnvLookup, ProcessEnv, parse_duration};
use crate::validation::{ConfigWarnings, apply_guard_rails};

use error::ConfigLoadError;

/// Result of a successful load: the effective config plus any soft findings.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

/// Builds a [`Config`] from defaults, an optional TOML file and the
/// environment. Environment values win over file values, which win over
/// defaults.
#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// `.env` file to import into the process environment before reading it.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let mut load = self.load_from(&ProcessEnv)?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Same as [`ConfigLoader::load`] but reads variables from `env`
    /// instead of the process environment, and ignores any `.env` file.
    pub fn load_from(&self, env: &impl EnvLookup) -> Result<ConfigLoad, ConfigLoadError> {
        let env = EnvConfig::gather(env);
        let config_path = self.config_path.clone().or_else(|| env.config_path.clone());

        let file = match &config_path {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };

        let config = merge(file, env, config_path)?;
        let warnings = apply_guard_rails(&config)?;
        for warning in &warnings.items {
            warn!(hint = warning.hint.as_deref(), "{}", warning.message);
        }

        info!(
            database = %config.database.url,
            page_size = config.pagination.page_size,
            load_more = config.pagination.load_more_count,
            "configuration loaded"
        );
        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        match &self.env_file {
            Some(path) if path.exists() => {
                dotenvy::from_path(path)?;
                debug!(path = %path.display(), "loaded env file");
                Ok(true)
            }
            Some(path) => {
                debug!(path = %path.display(), "env file not found; skipping");
                Ok(false)
            }
            None => match dotenvy::dotenv() {
                Ok(path) => {
                    debug!(path = %path.display(), "loaded .env");
                    Ok(true)
                }
                Err(err) if err.not_found() => Ok(false),
                Err(err) => Err(err.into()),
            },
        }
    }
}

pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::FileParse {
        path: path.to_path_buf(),
        source,
    })
}

fn file_duration(
    field: &'static str,
    raw: Option<String>,
) -> Result<Option<Duration>, ConfigLoadError> {
    raw.map(|value| {
        parse_duration(&value).ok_or(ConfigLoadError::InvalidDuration { field, value })
    })
    .transpose()
}

fn merge(
    file: FileConfig,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<Config, ConfigLoadError> {
    let database_defaults = DatabaseConfig::default();
    let database = DatabaseConfig {
        url: env
            .database_url
            .or(file.database.url)
            .unwrap_or(database_defaults.url),
        max_connections: env
            .database_max_connections
            .or(file.database.max_connections)
            .unwrap_or(database_defaults.max_connections),
    };

    let pagination_defaults = PaginationSettings::default();
    let file_load_timeout = file_duration("pagination.load_timeout", file.pagination.load_timeout)?;
    let pagination = PaginationSettings {
        page_size: env
            .page_size
            .or(file.pagination.page_size)
            .unwrap_or(pagination_defaults.page_size),
        load_more_count: env
            .load_more_count
            .or(file.pagination.load_more_count)
            .unwrap_or(pagination_defaults.load_more_count),
        prefetch_distance: env
            .prefetch_distance
            .or(file.pagination.prefetch_distance)
            .unwrap_or(pagination_defaults.prefetch_distance),
        load_timeout: env
            .load_timeout
            .or(file_load_timeout)
            .unwrap_or(pagination_defaults.load_timeout),
    };

    let search_defaults = SearchSettings::default();
    let file_search_timeout = file_duration("search.timeout", file.search.timeout)?;
    let search = SearchSettings {
        base_url: env
            .search_base_url
            .or(file.search.base_url)
            .unwrap_or(search_defaults.base_url),
        api_key: env
            .search_api_key
            .or(file.search.api_key.filter(|key| !key.trim().is_empty())),
        max_results: env
            .search_max_results
            .or(file.search.max_results)
            .unwrap_or(search_defaults.max_results),
        timeout: env
            .search_timeout
            .or(file_search_timeout)
            .unwrap_or(search_defaults.timeout),
    };

    let preferences_defaults = PreferencesConfig::default();
    let preferences = PreferencesConfig {
        dir: env
            .preferences_dir
            .or(file.preferences.dir)
            .unwrap_or(preferences_defaults.dir),
        namespace: env
            .preferences_namespace
            .or(file.preferences.namespace)
            .unwrap_or(preferences_defaults.namespace),
    };

    Ok(Config {
        database,
        pagination,
        search,
        preferences,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    })
}
