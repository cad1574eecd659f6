//! Index collaborator interface.
//!
//! Facetry does not implement an index. It talks to one through three
//! traits:
//!
//! - [`IndexProvider`]: resolves an index by database name
//! - [`SearchIndex`]: opens a scoped [`QueryContext`]
//! - [`QueryContext`]: runs one composed [`IndexQuery`] and returns [`RawResults`]
//!
//! A context is held by a [`ContextGuard`] for the duration of one search and
//! released when the guard drops, on success and failure alike.
//!
//! # Async
//!
//! Opening a context and running a query are async to support I/O-bound
//! index clients without blocking.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use facetry_core::{Result, SearchItem};
use serde::{Deserialize, Serialize};

use crate::predicate::Predicate;

/// Conventional index name for a database.
pub fn index_name_for(database: &str) -> String {
    format!("search_{database}_index")
}

/// Aggregation request for one facet field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRequest {
    /// Index field to aggregate on.
    pub field: String,
    /// Buckets with fewer hits are dropped.
    pub min_count: usize,
}

/// One page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub index: usize,
    /// Items per page.
    pub size: usize,
}

impl PageRequest {
    /// Number of items to skip.
    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size)
    }
}

/// A composed query, as handed to the index.
///
/// Built fluently: [`IndexQuery::new`] sets the base predicate, then
/// [`facet_on`](Self::facet_on), [`filter`](Self::filter) and
/// [`page`](Self::page) add to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuery {
    /// Base match predicate.
    pub predicate: Predicate,
    /// Additional narrowing filters, all of which must hold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Predicate>,
    /// Facet aggregation requests, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<FacetRequest>,
    /// Page to return; `None` returns the full match set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRequest>,
}

impl IndexQuery {
    /// Start a query from its base predicate.
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            filters: Vec::new(),
            facets: Vec::new(),
            page: None,
        }
    }

    /// Request aggregation on `field`.
    pub fn facet_on(mut self, field: impl Into<String>, min_count: usize) -> Self {
        self.facets.push(FacetRequest {
            field: field.into(),
            min_count,
        });
        self
    }

    /// Narrow the match set further.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    /// Return only page `index` (zero-based) of `size` items.
    pub fn page(mut self, index: usize, size: usize) -> Self {
        self.page = Some(PageRequest { index, size });
        self
    }

    /// Render as JSON, for collaborators that take the composed query over
    /// the wire.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a query rendered by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The base predicate and every filter, as one conjunction.
    pub fn effective_predicate(&self) -> Predicate {
        Predicate::all_of(
            std::iter::once(self.predicate.clone()).chain(self.filters.iter().cloned()),
        )
    }
}

impl fmt::Display for IndexQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WHERE {}", self.predicate)?;
        for filter in &self.filters {
            write!(f, " FILTER {filter}")?;
        }
        for facet in &self.facets {
            write!(f, " FACET {}>={}", facet.field, facet.min_count)?;
        }
        if let Some(page) = self.page {
            write!(f, " PAGE {}x{}", page.index, page.size)?;
        }
        Ok(())
    }
}

/// One matching document with its relevance score.
#[derive(Debug, Clone)]
pub struct Hit<T> {
    /// The typed document.
    pub document: T,
    /// Relevance score (higher is better).
    pub score: f32,
}

/// One bucket of a facet category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    /// Bucket value.
    pub name: String,
    /// Number of matching documents with this value.
    pub aggregate_count: u64,
}

/// Aggregated buckets for one facet field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCategory {
    /// Index field name.
    pub name: String,
    /// Buckets.
    pub values: Vec<FacetBucket>,
}

/// What the index returns for one query.
#[derive(Debug, Clone)]
pub struct RawResults<T> {
    /// Size of the full (unpaged) match set.
    pub total_search_results: usize,
    /// The requested page of hits, in index order.
    pub hits: Vec<Hit<T>>,
    /// Facet aggregates.
    pub categories: Vec<FacetCategory>,
}

impl<T> RawResults<T> {
    /// No hits, no facets.
    pub fn empty() -> Self {
        Self {
            total_search_results: 0,
            hits: Vec::new(),
            categories: Vec::new(),
        }
    }
}

/// A scoped query context, exclusively owned for one search.
#[async_trait]
pub trait QueryContext<T: SearchItem>: Send {
    /// Execute a composed query.
    async fn get_results(&mut self, query: &IndexQuery) -> Result<RawResults<T>>;

    /// Release the context. Called exactly once, by [`ContextGuard`].
    fn release(&mut self) {}
}

/// A searchable index of `T` documents.
#[async_trait]
pub trait SearchIndex<T: SearchItem>: Send + Sync {
    /// Index name for diagnostics.
    fn name(&self) -> &str;

    /// Open a scoped query context.
    async fn open_context(&self) -> Result<Box<dyn QueryContext<T>>>;
}

/// Resolves indexes by database name.
pub trait IndexProvider<T: SearchItem>: Send + Sync {
    /// Resolve the index serving `database`.
    fn resolve_index(&self, database: &str) -> Result<Arc<dyn SearchIndex<T>>>;
}

/// Owns a [`QueryContext`] and releases it on drop.
pub struct ContextGuard<T: SearchItem> {
    context: Box<dyn QueryContext<T>>,
}

impl<T: SearchItem> ContextGuard<T> {
    /// Take ownership of an open context.
    pub fn new(context: Box<dyn QueryContext<T>>) -> Self {
        Self { context }
    }

    /// Open a context on `index` and guard it.
    pub async fn open(index: &dyn SearchIndex<T>) -> Result<Self> {
        Ok(Self::new(index.open_context().await?))
    }

    /// Execute a composed query on the guarded context.
    pub async fn get_results(&mut self, query: &IndexQuery) -> Result<RawResults<T>> {
        self.context.get_results(query).await
    }
}

impl<T: SearchItem> Drop for ContextGuard<T> {
    fn drop(&mut self) {
        log::trace!("Releasing query context");
        self.context.release();
    }
}

impl<T: SearchItem> fmt::Debug for ContextGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextGuard").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
