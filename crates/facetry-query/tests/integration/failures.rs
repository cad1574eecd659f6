//! Integration tests for failure handling and index resolution.

use std::io::Write;
use std::sync::Arc;

use facetry_core::Error;
use facetry_query::{MemoryIndexProvider, Predicate, QueryConfig, SearchQuery};

use crate::common::{Product, names, search_over, shirts};

#[tokio::test]
async fn test_unknown_field_fails_and_releases_context() {
    let (index, mut query) = search_over(shirts());
    query.must(Predicate::equals("weight", "heavy"));

    let err = query.execute(None).await.unwrap_err();

    assert!(matches!(err, Error::Index { .. }));
    assert!(err.to_string().contains("weight"));
    assert_eq!(index.queries_executed(), 1);
    assert_eq!(index.contexts_opened(), 1);
    assert_eq!(index.open_contexts(), 0);
}

#[tokio::test]
async fn test_unavailable_index_is_retryable() {
    let (index, query) = search_over(shirts());
    index.set_available(false);

    let err = query.execute(None).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(index.queries_executed(), 0);

    index.set_available(true);
    assert_eq!(query.execute(None).await.unwrap().total_results, 6);
    assert_eq!(index.open_contexts(), 0);
}

#[tokio::test]
async fn test_one_query_per_execution() {
    let (index, query) = search_over(shirts());

    for _ in 0..3 {
        query.execute(Some("red")).await.unwrap();
    }

    assert_eq!(index.queries_executed(), 3);
    assert_eq!(index.contexts_opened(), 3);
    assert_eq!(index.open_contexts(), 0);
}

#[tokio::test]
async fn test_search_by_database() {
    let mut provider = MemoryIndexProvider::new();
    provider.register("web", shirts());
    provider.register("master", Vec::new());

    let query = SearchQuery::<Product>::for_database(&provider, "web").unwrap();
    assert_eq!(query.index().name(), "search_web_index");
    assert_eq!(query.execute(None).await.unwrap().total_results, 6);

    let empty = SearchQuery::<Product>::for_database(&provider, "master").unwrap();
    assert!(empty.execute(None).await.unwrap().is_empty());

    let err = SearchQuery::<Product>::for_database(&provider, "archive").unwrap_err();
    assert!(matches!(err, Error::IndexNotFound { ref index } if index == "search_archive_index"));
}

#[tokio::test]
async fn test_configuration_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
page_size = 2

[[must]]
leaf = {{ equals = {{ field = "color_s", value = "red" }} }}
"#
    )
    .unwrap();

    let config = QueryConfig::load(file.path()).unwrap();
    let (index, _) = search_over(shirts());
    let query: SearchQuery<Product> = SearchQuery::with_config(Arc::new(index), config);

    let results = query.execute(None).await.unwrap();
    assert_eq!(results.total_results, 3);
    assert_eq!(results.total_pages, Some(2));
    assert_eq!(names(&results.results), vec!["oxford", "flannel"]);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let err = QueryConfig::from_toml_str("page_size = \"many\"").unwrap_err();
    assert!(err.is_configuration());
}
