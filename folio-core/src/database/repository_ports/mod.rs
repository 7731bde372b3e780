//! Repository ports for the catalog. Adapters live in sibling modules and
//! must not leak storage types into callers.

pub mod items;

pub use items::{DuplicateKey, ItemRepository};
