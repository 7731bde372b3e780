//! Circulation capabilities attached to item kinds.
//!
//! Which actions an item supports is a property of its kind, expressed as a
//! small flag set and checked where the action is requested.

use std::fmt::{self, Display};

/// A single circulation action an item kind may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Capability {
    /// Can be borrowed and taken home.
    TakeHome,
    /// Can be read on site in the reading room.
    ReadInLibrary,
    /// Can be digitized into a disk copy.
    Digitize,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Capability::TakeHome => 0b001,
            Capability::ReadInLibrary => 0b010,
            Capability::Digitize => 0b100,
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::TakeHome => write!(f, "take home"),
            Capability::ReadInLibrary => write!(f, "read in library"),
            Capability::Digitize => write!(f, "digitize"),
        }
    }
}

/// Set of [`Capability`] flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);

    pub const fn of(caps: &[Capability]) -> Capabilities {
        let mut bits = 0;
        let mut i = 0;
        while i < caps.len() {
            bits |= caps[i].bit();
            i += 1;
        }
        Capabilities(bits)
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        [
            Capability::TakeHome,
            Capability::ReadInLibrary,
            Capability::Digitize,
        ]
        .into_iter()
        .filter(|cap| self.contains(*cap))
    }
}
