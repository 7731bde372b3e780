use std::fmt::{self, Display};

/// Errors produced by model constructors and parsing routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownKind(String),
    UnknownMonth(String),
    UnknownSortField(String),
    UnknownSortOrder(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownKind(raw) => {
                write!(f, "unknown item kind: {raw}")
            }
            ModelError::UnknownMonth(raw) => write!(f, "unknown month: {raw}"),
            ModelError::UnknownSortField(raw) => {
                write!(f, "unknown sort field: {raw}")
            }
            ModelError::UnknownSortOrder(raw) => {
                write!(f, "unknown sort order: {raw}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
