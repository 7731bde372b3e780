use std::fmt::{self, Display};

use crate::error::ModelError;

/// Publication month of a newspaper issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Human readable name; also the persisted representation.
    pub fn display_name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_display_name(raw: &str) -> Option<Month> {
        let needle = raw.trim();
        Month::ALL
            .into_iter()
            .find(|month| month.display_name().eq_ignore_ascii_case(needle))
    }

    /// First enumerated value, used when a stored month is missing.
    pub fn first() -> Month {
        Month::ALL[0]
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Month {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::from_display_name(s)
            .ok_or_else(|| ModelError::UnknownMonth(s.to_string()))
    }
}
