//! In-memory index.
//!
//! [`MemoryIndex`] is a linear-scan implementation of the index collaborator,
//! used as a fallback for small collections and as the reference backend in
//! tests. Every query evaluates the predicate against every document.
//!
//! # Limitations
//!
//! - O(n) search time
//! - All documents must fit in memory
//! - Scoring is a plain count of matching text conditions, not BM25

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use facetry_core::{Error, Result, SearchItem, fields};
use tokio::sync::{Mutex, RwLock};

use crate::index::{
    FacetBucket, FacetCategory, FacetRequest, Hit, IndexProvider, IndexQuery, QueryContext,
    RawResults, SearchIndex, index_name_for,
};
use crate::predicate::{Condition, Predicate, fuzzy_similarity};

#[derive(Debug, Default)]
struct Stats {
    open_contexts: AtomicUsize,
    contexts_opened: AtomicUsize,
    queries_executed: AtomicUsize,
}

struct Shared<T> {
    name: String,
    documents: RwLock<Vec<T>>,
    available: AtomicBool,
    stats: Stats,
    last_query: Mutex<Option<IndexQuery>>,
}

/// Linear-scan index over documents held in memory.
///
/// Cloning yields another handle on the same documents.
pub struct MemoryIndex<T> {
    shared: Arc<Shared<T>>,
}

impl<T: SearchItem> MemoryIndex<T> {
    /// Create an empty index.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_documents(name, Vec::new())
    }

    /// Create an index holding `documents`.
    pub fn with_documents(name: impl Into<String>, documents: Vec<T>) -> Self {
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                documents: RwLock::new(documents),
                available: AtomicBool::new(true),
                stats: Stats::default(),
                last_query: Mutex::new(None),
            }),
        }
    }

    /// Add a document.
    pub async fn insert(&self, document: T) {
        self.shared.documents.write().await.push(document);
    }

    /// Add documents.
    pub async fn extend<I: IntoIterator<Item = T>>(&self, documents: I) {
        self.shared.documents.write().await.extend(documents);
    }

    /// Number of indexed documents.
    pub async fn document_count(&self) -> usize {
        self.shared.documents.read().await.len()
    }

    /// Simulate the backend going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.shared.available.store(available, Ordering::SeqCst);
    }

    /// Contexts opened and not yet released.
    pub fn open_contexts(&self) -> usize {
        self.shared.stats.open_contexts.load(Ordering::SeqCst)
    }

    /// Contexts opened over the index's lifetime.
    pub fn contexts_opened(&self) -> usize {
        self.shared.stats.contexts_opened.load(Ordering::SeqCst)
    }

    /// Queries received over the index's lifetime, including failed ones.
    pub fn queries_executed(&self) -> usize {
        self.shared.stats.queries_executed.load(Ordering::SeqCst)
    }

    /// The most recently received query.
    pub async fn last_query(&self) -> Option<IndexQuery> {
        self.shared.last_query.lock().await.clone()
    }
}

impl<T> Clone for MemoryIndex<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for MemoryIndex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryIndex")
            .field("name", &self.shared.name)
            .field("stats", &self.shared.stats)
            .finish()
    }
}

#[async_trait]
impl<T: SearchItem> SearchIndex<T> for MemoryIndex<T> {
    fn name(&self) -> &str {
        &self.shared.name
    }

    async fn open_context(&self) -> Result<Box<dyn QueryContext<T>>> {
        if !self.shared.available.load(Ordering::SeqCst) {
            log::warn!("Index '{}' is unavailable", self.shared.name);
            return Err(Error::index(format!(
                "index '{}' is unavailable",
                self.shared.name
            )));
        }
        self.shared.stats.open_contexts.fetch_add(1, Ordering::SeqCst);
        self.shared.stats.contexts_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryContext {
            shared: Arc::clone(&self.shared),
            released: false,
        }))
    }
}

struct MemoryContext<T> {
    shared: Arc<Shared<T>>,
    released: bool,
}

#[async_trait]
impl<T: SearchItem> QueryContext<T> for MemoryContext<T> {
    async fn get_results(&mut self, query: &IndexQuery) -> Result<RawResults<T>> {
        self.shared
            .stats
            .queries_executed
            .fetch_add(1, Ordering::SeqCst);
        *self.shared.last_query.lock().await = Some(query.clone());

        if self.released {
            return Err(Error::index("query context already released"));
        }
        validate_fields::<T>(query)?;

        let predicate = query.effective_predicate();
        let documents = self.shared.documents.read().await;
        log::trace!(
            "Scanning {} documents in '{}'",
            documents.len(),
            self.shared.name
        );

        let mut hits: Vec<Hit<T>> = documents
            .iter()
            .filter(|doc| predicate.matches(*doc))
            .map(|doc| Hit {
                document: doc.clone(),
                score: score(&predicate, doc),
            })
            .collect();
        drop(documents);

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        let total_search_results = hits.len();
        let categories = query
            .facets
            .iter()
            .map(|request| aggregate(request, &hits))
            .collect();

        if let Some(page) = query.page {
            hits = hits
                .into_iter()
                .skip(page.offset())
                .take(page.size)
                .collect();
        }

        Ok(RawResults {
            total_search_results,
            hits,
            categories,
        })
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.shared.stats.open_contexts.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Reject queries referencing fields neither bound by `T` nor well known.
fn validate_fields<T: SearchItem>(query: &IndexQuery) -> Result<()> {
    let known = |name: &str| {
        fields::is_well_known(name) || T::bindings().iter().any(|b| b.index_field() == name)
    };

    let predicate = query.effective_predicate();
    let referenced = predicate
        .fields()
        .into_iter()
        .chain(query.facets.iter().map(|f| f.field.as_str()));

    for name in referenced {
        if !known(name) {
            log::debug!("Rejecting query on unknown field '{name}'");
            return Err(Error::index(format!("unknown field '{name}'")));
        }
    }
    Ok(())
}

/// One point for the match, plus the similarity of each matching text condition.
fn score<T: SearchItem>(predicate: &Predicate, doc: &T) -> f32 {
    let text_score: f32 = predicate
        .positive_conditions()
        .into_iter()
        .filter(|c| c.is_text() && c.matches(doc))
        .map(|c| match c {
            Condition::Fuzzy { field, term, .. } => doc
                .field(field)
                .map(|value| {
                    value
                        .strings()
                        .iter()
                        .map(|text| fuzzy_similarity(text, term))
                        .fold(0.0_f32, f32::max)
                })
                .unwrap_or(0.0),
            _ => 1.0,
        })
        .sum();
    1.0 + text_score
}

/// Count bucket values over the whole match set.
fn aggregate<T: SearchItem>(request: &FacetRequest, hits: &[Hit<T>]) -> FacetCategory {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for hit in hits {
        if let Some(value) = hit.document.field(&request.field) {
            // Repeated values within one document count once.
            let distinct: BTreeSet<&str> = value.strings().into_iter().collect();
            for s in distinct {
                *counts.entry(s.to_string()).or_default() += 1;
            }
        }
    }

    let mut buckets: Vec<FacetBucket> = counts
        .into_iter()
        .filter(|(_, count)| *count >= request.min_count as u64)
        .map(|(name, aggregate_count)| FacetBucket {
            name,
            aggregate_count,
        })
        .collect();
    buckets.sort_by(|a, b| {
        b.aggregate_count
            .cmp(&a.aggregate_count)
            .then_with(|| a.name.cmp(&b.name))
    });

    FacetCategory {
        name: request.field.clone(),
        values: buckets,
    }
}

/// Resolves databases to named [`MemoryIndex`]es.
pub struct MemoryIndexProvider<T> {
    indexes: HashMap<String, MemoryIndex<T>>,
}

impl<T: SearchItem> MemoryIndexProvider<T> {
    /// A provider with no indexes.
    pub fn new() -> Self {
        Self {
            indexes: HashMap::new(),
        }
    }

    /// Register an index for `database`, named by [`index_name_for`].
    pub fn register(&mut self, database: &str, documents: Vec<T>) -> MemoryIndex<T> {
        let index = MemoryIndex::with_documents(index_name_for(database), documents);
        self.indexes.insert(index_name_for(database), index.clone());
        index
    }
}

impl<T: SearchItem> Default for MemoryIndexProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SearchItem> IndexProvider<T> for MemoryIndexProvider<T> {
    fn resolve_index(&self, database: &str) -> Result<Arc<dyn SearchIndex<T>>> {
        let name = index_name_for(database);
        match self.indexes.get(&name) {
            Some(index) => Ok(Arc::new(index.clone())),
            None => Err(Error::IndexNotFound { index: name }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
