//! Facetry Core: shared types, traits and errors.
//!
//! This crate provides the foundational types used across all Facetry crates.
//! It has no internal Facetry dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`ids`]: Item identifiers
//! - [`item`]: The [`SearchItem`] trait and field bindings
//! - [`fields`]: Well-known index field names
//! - [`result_item`]: The [`SearchResultItem`] base item

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod fields;
pub mod ids;
pub mod item;
pub mod result_item;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use ids::ItemId;
pub use item::{FieldBinding, FieldValue, SearchItem};
pub use result_item::SearchResultItem;
