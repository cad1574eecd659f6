//! Facetry faceted search, umbrella crate.
//!
//! This crate re-exports the Facetry components for convenience:
//!
//! - [`core`]: item model, identifiers, well-known fields and errors
//! - [`query`]: predicates, facets, configuration and search execution
//!
//! Most users only need the [`prelude`].

pub use facetry_core as core;
pub use facetry_query as query;

/// The types needed to declare and run a faceted search.
pub mod prelude {
    pub use facetry_core::{
        Error, FieldBinding, FieldValue, ItemId, Result, SearchItem, SearchResultItem, fields,
    };
    pub use facetry_query::{
        FacetDefinition, FacetResult, FacetValue, IndexProvider, MemoryIndex,
        MemoryIndexProvider, Predicate, QueryConfig, SearchIndex, SearchQuery, SearchResults,
    };
}

// ============================================================================
// Tests
// ============================================================================
