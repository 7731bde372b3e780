//! SQLite adapter for the catalog, backed by `sqlx`.

mod items;

pub use items::SqliteItemRepository;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::StorageError;

/// Open (creating if needed) the catalog database at `url` and apply
/// pending migrations.
///
/// In-memory databases live only as long as their connection, so they are
/// pinned to a single connection that is never recycled.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, StorageError> {
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");
    let mut options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let mut pool_options = SqlitePoolOptions::new();
    pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    debug!(url, in_memory, "opened catalog database");

    crate::MIGRATOR.run(&pool).await?;
    info!("catalog database migrations applied");

    Ok(pool)
}
