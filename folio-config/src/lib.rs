//! Configuration loading for Folio.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (optionally imported from a `.env` file). The
//! resulting [`Config`] is checked by [`validation::apply_guard_rails`]
//! before it is handed out, and converts into the runtime settings that
//! `folio-core` consumes.

pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    Config, ConfigMetadata, DatabaseConfig, PaginationSettings, PreferencesConfig, SearchSettings,
};
pub use util::{EnvLookup, ProcessEnv};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
