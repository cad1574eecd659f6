//! Faceted-search query composition for Facetry.
//!
//! This crate builds a boolean match predicate over a typed result shape,
//! attaches facet requests and selected refinements, runs one paged query
//! against an abstract index and maps the raw hits and facet aggregates back
//! into typed, display-ready results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      facetry-query                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchQuery (orchestration, result mapping)                │
//! │  ├── PredicateBuilder (config → Predicate)                  │
//! │  └── FacetDefinition / FacetValue (facet pipeline)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Predicate / Condition (boolean algebra)                    │
//! │  QueryConfig (serde + TOML)                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IndexProvider → SearchIndex → QueryContext (collaborator)  │
//! │  └── MemoryIndex (linear-scan fallback)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use facetry_core::{ItemId, SearchResultItem, fields};
//! use facetry_query::{FacetDefinition, MemoryIndex, SearchQuery};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let index = MemoryIndex::with_documents(
//!     "web",
//!     vec![
//!         SearchResultItem::new("keep", ItemId::NULL).with_content("The castle keep"),
//!         SearchResultItem::new("moat", ItemId::NULL).with_content("A moat"),
//!     ],
//! );
//!
//! let mut query: SearchQuery<SearchResultItem> = SearchQuery::new(Arc::new(index));
//! query.facet(FacetDefinition::new("name")?);
//!
//! let results = query.execute(Some("castle")).await?;
//! assert_eq!(results.total_results, 1);
//! assert_eq!(results.facet(fields::NAME).unwrap().values[0].value, "keep");
//! # Ok::<(), facetry_core::Error>(())
//! # }).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod facet;
pub mod index;
pub mod memory;
pub mod predicate;
pub mod results;
pub mod search;

// Re-exports
pub use builder::PredicateBuilder;
pub use config::QueryConfig;
pub use facet::{DisplayFn, FacetDefinition, FacetResult, FacetValue};
pub use index::{
    ContextGuard, FacetBucket, FacetCategory, FacetRequest, Hit, IndexProvider, IndexQuery,
    PageRequest, QueryContext, RawResults, SearchIndex, index_name_for,
};
pub use memory::{MemoryIndex, MemoryIndexProvider};
pub use predicate::{Condition, Predicate};
pub use results::SearchResults;
pub use search::SearchQuery;
