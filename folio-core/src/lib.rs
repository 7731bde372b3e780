//! # Folio Core
//!
//! Catalog engine for a small lending library holding books, newspapers and
//! disks.
//!
//! ## Overview
//!
//! - **Item store**: an async repository port with SQLite and in-memory
//!   adapters, paged reads in a configurable sort order
//! - **Pagination**: a sliding window over the sorted catalog that grows at
//!   either end on demand and trims the opposite end
//! - **View state**: list rows with loading markers and minimal row diffs
//! - **Remote search**: Google Books lookup and duplicate-aware import
//! - **Circulation**: lending, returns and digitization gated on item
//!   capabilities
//!
//! ## Feature Flags
//!
//! - `database`: SQLite storage through SQLx (default)
//! - `demo`: the built-in sample catalog (default)
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use folio_core::{
//!     database::InMemoryItemRepository,
//!     pagination::{PaginationConfig, PaginationController},
//! };
//! use folio_model::SortPreference;
//!
//! async fn first_page() {
//!     let repo = Arc::new(InMemoryItemRepository::new());
//!     let controller =
//!         PaginationController::new(repo, PaginationConfig::default(), SortPreference::default());
//!     controller.load_initial(SortPreference::default()).finished().await;
//!     println!("{} items loaded", controller.snapshot().window.len());
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod circulation;
pub mod database;
#[cfg(feature = "demo")]
#[cfg_attr(docsrs, doc(cfg(feature = "demo")))]
pub mod demo;
pub mod error;
pub mod import;
pub mod input;
pub mod pagination;
pub mod providers;
pub mod session;
pub mod settings;
pub mod view_state;

pub use folio_model;

pub use circulation::{CirculationAction, CirculationOutcome};
pub use database::{DuplicateKey, InMemoryItemRepository, ItemRepository, StorageResult};
#[cfg(feature = "database")]
pub use database::SqliteItemRepository;
pub use error::{CatalogError, Result, StorageError};
pub use import::{ImportOutcome, import_remote_book};
pub use input::{Field, ItemDraft, ValidationErrors};
pub use pagination::{
    LoadHandle, LoadOutcome, Notice, PaginationConfig, PaginationController,
    PaginationSnapshot, PaginationState, Window,
};
pub use providers::{BookSearchProvider, GoogleBooksProvider, ProviderError, SearchQuery};
pub use session::{LibrarySession, SessionUpdate};
pub use settings::{
    InMemoryPreferenceStore, JsonFilePreferenceStore, PreferenceStore, SortPreferenceRepository,
};
pub use view_state::{Row, RowDiff, diff, project};

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
