use std::sync::Arc;

use anyhow::{Context, Result};
use folio_config::ConfigLoader;
use folio_core::database::sqlite::connect;
use folio_core::pagination::PaginationConfig;
use folio_core::providers::{GoogleBooksConfig, GoogleBooksProvider};
use folio_core::settings::{JsonFilePreferenceStore, SortPreferenceRepository};
use folio_core::{ItemRepository, LibrarySession, SqliteItemRepository};
use tracing::debug;

use crate::cli::Cli;

/// Everything a command needs: the open store and a running session.
pub struct App {
    pub repo: Arc<dyn ItemRepository>,
    pub session: LibrarySession,
}

impl App {
    pub async fn open(cli: &Cli) -> Result<Self> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &cli.config {
            loader = loader.with_config_path(path);
        }
        if let Some(path) = &cli.env_file {
            loader = loader.with_env_file(path);
        }
        let mut config = loader
            .load()
            .context("failed to load configuration")?
            .config;
        if let Some(url) = &cli.database_url {
            config.database.url = url.clone();
        }

        config
            .ensure_directories()
            .context("failed to create preference directory")?;

        let pool = connect(&config.database.url, config.database.max_connections)
            .await
            .with_context(|| format!("failed to open catalog at {}", config.database.url))?;
        let repo: Arc<dyn ItemRepository> = Arc::new(SqliteItemRepository::new(pool));

        let preferences = SortPreferenceRepository::new(Arc::new(JsonFilePreferenceStore::new(
            config.preferences_dir(),
            &config.preferences.namespace,
        )));
        let search = GoogleBooksProvider::new(GoogleBooksConfig::from(&config.search))
            .context("failed to build search client")?;

        let (session, initial) = LibrarySession::start(
            Arc::clone(&repo),
            preferences,
            Arc::new(search),
            PaginationConfig::from(&config.pagination),
        )
        .await;
        let outcome = initial.finished().await;
        debug!(?outcome, "initial window loaded");

        Ok(Self { repo, session })
    }
}
