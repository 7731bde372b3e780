use std::fmt::{self, Display};

use crate::error::ModelError;

/// Field the catalog listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SortField {
    Name,
    #[default]
    DateAdded,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "NAME",
            SortField::DateAdded => "DATE_ADDED",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NAME" => Ok(SortField::Name),
            "DATE_ADDED" | "DATE-ADDED" | "DATE" => Ok(SortField::DateAdded),
            _ => Err(ModelError::UnknownSortField(s.to_string())),
        }
    }
}

/// Direction of the catalog ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(ModelError::UnknownSortOrder(s.to_string())),
        }
    }
}

/// The user's chosen ordering. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortPreference {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortPreference {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

impl Display for SortPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.order.as_str())
    }
}

/// Parses `FIELD[:ORDER]`, e.g. `name:asc` or `date_added`.
impl std::str::FromStr for SortPreference {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = match s.split_once(':') {
            Some((field, order)) => (field, Some(order)),
            None => (s, None),
        };
        let field = field.parse::<SortField>()?;
        let order = match order {
            Some(order) => order.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };
        Ok(SortPreference { field, order })
    }
}
