//! Search orchestration.
//!
//! [`SearchQuery`] owns the configuration of a search and its facet
//! declarations. [`SearchQuery::execute`] composes one [`IndexQuery`], runs it
//! in a scoped context and maps the raw output into [`SearchResults`].
//!
//! # Example
//!
//! ```rust,ignore
//! use facetry_query::{FacetDefinition, SearchQuery};
//!
//! let mut query = SearchQuery::new(index);
//! query
//!     .search_field("title")
//!     .fuzziness(0.6)
//!     .page_size(20)
//!     .facet(FacetDefinition::new("color")?.with_selected(["red"]));
//!
//! let results = query.execute(Some("castle")).await?;
//! for value in &results.facet("color_s").unwrap().values {
//!     println!("{} ({}){}", value.display_value(), value.count,
//!              if value.selected { " *" } else { "" });
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use facetry_core::{ItemId, Result, SearchItem};

use crate::builder::PredicateBuilder;
use crate::config::QueryConfig;
use crate::facet::{FacetDefinition, FacetResult, FacetValue};
use crate::index::{ContextGuard, FacetCategory, Hit, IndexProvider, IndexQuery, SearchIndex};
use crate::predicate::Predicate;
use crate::results::{SearchResults, total_pages};

/// A configurable faceted search over an index of `T`.
///
/// Not internally synchronized: mutate and execute from one task at a time,
/// or use one instance per request.
pub struct SearchQuery<T: SearchItem> {
    index: Arc<dyn SearchIndex<T>>,
    config: QueryConfig,
    facets: Vec<FacetDefinition<T>>,
}

impl<T: SearchItem> SearchQuery<T> {
    /// A search with the default configuration.
    pub fn new(index: Arc<dyn SearchIndex<T>>) -> Self {
        Self::with_config(index, QueryConfig::default())
    }

    /// A search with an explicit configuration.
    pub fn with_config(index: Arc<dyn SearchIndex<T>>, config: QueryConfig) -> Self {
        Self {
            index,
            config,
            facets: Vec::new(),
        }
    }

    /// A search on the index serving `database`.
    pub fn for_database(provider: &dyn IndexProvider<T>, database: &str) -> Result<Self> {
        Ok(Self::new(provider.resolve_index(database)?))
    }

    /// The index this search runs against.
    pub fn index(&self) -> &Arc<dyn SearchIndex<T>> {
        &self.index
    }

    /// The configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut QueryConfig {
        &mut self.config
    }

    /// Add a field to match search terms against.
    pub fn search_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.config.fields_to_search.push(field.into());
        self
    }

    /// Add a mandatory condition.
    pub fn must(&mut self, condition: Predicate) -> &mut Self {
        self.config.must.push(condition);
        self
    }

    /// Add an optional condition.
    pub fn could(&mut self, condition: Predicate) -> &mut Self {
        self.config.could.push(condition);
        self
    }

    /// Restrict the last-updated date; `None` leaves an end unbounded.
    pub fn date_range(
        &mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> &mut Self {
        self.config.from = from;
        self.config.to = to;
        self
    }

    /// Only return items below `root`. [`ItemId::NULL`] clears the scope.
    pub fn root_scope(&mut self, root: ItemId) -> &mut Self {
        self.config.root_scope = Some(root).filter(|id| !id.is_null());
        self
    }

    /// Allow items of `template`.
    pub fn restrict_template(&mut self, template: ItemId) -> &mut Self {
        self.config.restrict_templates.push(template);
        self
    }

    /// Toggle the current-language restriction.
    pub fn restrict_to_current_language(&mut self, restrict: bool) -> &mut Self {
        self.config.restrict_to_current_language = restrict;
        self
    }

    /// Set the current language.
    pub fn language(&mut self, language: impl Into<String>) -> &mut Self {
        self.config.language = language.into();
        self
    }

    /// Set the fuzziness; 0 is exact.
    pub fn fuzziness(&mut self, fuzziness: f32) -> &mut Self {
        self.config.fuzziness = fuzziness;
        self
    }

    /// Set the one-based page number.
    pub fn page(&mut self, page: usize) -> &mut Self {
        self.config.page = page;
        self
    }

    /// Set the page size; 0 disables paging.
    pub fn page_size(&mut self, page_size: usize) -> &mut Self {
        self.config.page_size = page_size;
        self
    }

    /// Set the minimum bucket count for facets.
    pub fn min_facet_count(&mut self, min_count: usize) -> &mut Self {
        self.config.min_facet_count = min_count;
        self
    }

    /// Declare a facet.
    pub fn facet(&mut self, definition: FacetDefinition<T>) -> &mut Self {
        self.facets.push(definition);
        self
    }

    /// Declared facets.
    pub fn facets(&self) -> &[FacetDefinition<T>] {
        &self.facets
    }

    /// Mutable access to a declared facet, by facet name.
    pub fn facet_mut(&mut self, facet_name: &str) -> Option<&mut FacetDefinition<T>> {
        self.facets.iter_mut().find(|f| f.facet_name() == facet_name)
    }

    /// The base match predicate for `search_terms`.
    pub fn predicate(&self, search_terms: Option<&str>) -> Predicate {
        PredicateBuilder::new(&self.config).build(search_terms)
    }

    /// Compose the query that [`execute`](Self::execute) would send.
    ///
    /// Every selected facet value becomes a hard `field == value` filter, so
    /// selecting a value narrows the result set rather than only the buckets.
    pub fn build_query(&self, search_terms: Option<&str>) -> IndexQuery {
        let mut query = IndexQuery::new(self.predicate(search_terms));
        for facet in &self.facets {
            query = query.facet_on(facet.facet_name(), self.config.min_facet_count);
            for value in facet.filter() {
                query = query.filter(facet.create_filter_expression(value));
            }
        }
        if self.config.is_paged() {
            query = query.page(self.config.page_index(), self.config.page_size);
        }
        query
    }

    /// Run the search.
    ///
    /// Issues exactly one query. The query context is released before this
    /// returns, whether the index succeeded or failed; failures are returned
    /// as they are, without retry and without partial results.
    pub async fn execute(&self, search_terms: Option<&str>) -> Result<SearchResults<T>> {
        let query = self.build_query(search_terms);
        log::debug!("Executing on '{}': {query}", self.index.name());

        let raw = {
            let mut context = ContextGuard::open(self.index.as_ref()).await?;
            context.get_results(&query).await?
        };

        let results = self.map_hits(raw.hits);
        let facets = self.map_facets(&raw.categories);
        let page_size = if self.config.is_paged() {
            self.config.page_size
        } else {
            0
        };

        log::debug!(
            "Search on '{}' matched {} ({} on page)",
            self.index.name(),
            raw.total_search_results,
            results.len()
        );

        Ok(SearchResults {
            total_results: raw.total_search_results,
            results,
            total_pages: total_pages(raw.total_search_results, page_size),
            page: self.config.page_index() + 1,
            page_size,
            facets,
        })
    }

    /// Order hits by descending score and stamp scores into the items.
    fn map_hits(&self, mut hits: Vec<Hit<T>>) -> Vec<T> {
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.into_iter()
            .map(|hit| {
                let mut document = hit.document;
                if let Some(slot) = document.score_mut() {
                    *slot = hit.score;
                }
                document
            })
            .collect()
    }

    /// Attach each returned category to the first facet with the same name.
    fn map_facets(&self, categories: &[FacetCategory]) -> Vec<FacetResult<T>> {
        let mut facets: Vec<FacetResult<T>> = self
            .facets
            .iter()
            .map(|definition| FacetResult::empty(Arc::new(definition.clone())))
            .collect();

        for category in categories {
            let Some(facet) = facets.iter_mut().find(|f| f.facet_name() == category.name) else {
                log::trace!("Ignoring undeclared facet category '{}'", category.name);
                continue;
            };
            let definition = facet.definition_arc();
            facet.values = category
                .values
                .iter()
                .map(|bucket| {
                    FacetValue::new(
                        bucket.name.clone(),
                        bucket.aggregate_count,
                        Arc::clone(&definition),
                    )
                })
                .collect();
            log::trace!(
                "Facet '{}' mapped {} buckets",
                category.name,
                facet.values.len()
            );
        }
        facets
    }
}

impl<T: SearchItem> std::fmt::Debug for SearchQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchQuery")
            .field("index", &self.index.name())
            .field("config", &self.config)
            .field("facets", &self.facets)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
