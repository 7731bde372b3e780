use std::time::Duration;

use thiserror::Error;

use crate::input::ValidationErrors;
use crate::providers::ProviderError;

/// Failures of local persistence: the item store and the preference store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "database")]
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("corrupt row {id}: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Unique-ISBN and similar violations reported by the engine are
    /// surfaced as [`StorageError::Constraint`].
    #[cfg(feature = "database")]
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return StorageError::Constraint(db_err.message().to_string());
        }
        StorageError::Database(err)
    }
}

/// Top-level error of catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Network(#[from] ProviderError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation cancelled")]
    Cancelled,
}

impl CatalogError {
    /// Text suitable for a transient notice or an error banner.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Storage(StorageError::Constraint(_)) => {
                "The item conflicts with an existing catalog entry".to_string()
            }
            CatalogError::Storage(_) => "Database operation failed".to_string(),
            CatalogError::Network(ProviderError::Status { status, .. }) => {
                format!("Server communication error (code {status})")
            }
            CatalogError::Network(ProviderError::Decode(_)) => {
                "Unexpected response from the search service".to_string()
            }
            CatalogError::Network(_) => {
                "Network connection error, check your connection".to_string()
            }
            CatalogError::Validation(errors) => errors.to_string(),
            CatalogError::Timeout(_) => {
                "The operation took too long, try again".to_string()
            }
            CatalogError::Cancelled => "The operation was cancelled".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_part_of_the_message() {
        let err = CatalogError::Network(ProviderError::Status {
            status: 503,
            message: "unavailable".into(),
        });
        assert_eq!(err.user_message(), "Server communication error (code 503)");
    }

    #[test]
    fn storage_failures_hide_engine_details() {
        let err = CatalogError::Storage(StorageError::Corrupt {
            id: 4,
            reason: "bad type".into(),
        });
        assert_eq!(err.user_message(), "Database operation failed");
    }
}
