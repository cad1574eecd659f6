//! Search results.

use crate::facet::FacetResult;

/// Number of pages needed for `total` items, or `None` when paging is off.
///
/// ```
/// use facetry_query::results::total_pages;
///
/// assert_eq!(total_pages(23, 10), Some(3));
/// assert_eq!(total_pages(20, 10), Some(2));
/// assert_eq!(total_pages(0, 10), Some(0));
/// assert_eq!(total_pages(23, 0), None);
/// ```
pub fn total_pages(total: usize, page_size: usize) -> Option<usize> {
    (page_size > 0).then(|| total.div_ceil(page_size))
}

/// The outcome of one search execution.
///
/// Each execution produces a fresh value; re-running a query never mutates
/// results handed out earlier.
#[derive(Debug, Clone)]
pub struct SearchResults<T> {
    /// Size of the full (unpaged) match set, as reported by the index.
    pub total_results: usize,
    /// Items of the requested page, highest score first.
    pub results: Vec<T>,
    /// Page count; `None` when paging is disabled.
    pub total_pages: Option<usize>,
    /// One-based page these results belong to.
    pub page: usize,
    /// Page size used; 0 when paging is disabled.
    pub page_size: usize,
    /// One entry per declared facet, in declaration order.
    pub facets: Vec<FacetResult<T>>,
}

impl<T> SearchResults<T> {
    /// Whether the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether paging was applied.
    pub fn is_paged(&self) -> bool {
        self.total_pages.is_some()
    }

    /// Whether a later page exists.
    pub fn has_next_page(&self) -> bool {
        self.total_pages.is_some_and(|pages| self.page < pages)
    }

    /// Whether an earlier page exists.
    pub fn has_previous_page(&self) -> bool {
        self.is_paged() && self.page > 1
    }

    /// Facet buckets by facet name.
    pub fn facet(&self, facet_name: &str) -> Option<&FacetResult<T>> {
        self.facets.iter().find(|f| f.facet_name() == facet_name)
    }

    /// Iterate over the items of this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.results.iter()
    }
}

impl<T> IntoIterator for SearchResults<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
