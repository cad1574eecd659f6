//! Integration tests for paging.

use crate::common::{names, numbered, search_over};

#[tokio::test]
async fn test_twenty_three_items_make_three_pages() {
    let (_, mut query) = search_over(numbered(23));

    let first = query.execute(None).await.unwrap();
    assert_eq!(first.total_results, 23);
    assert_eq!(first.total_pages, Some(3));
    assert_eq!(first.page, 1);
    assert_eq!(first.len(), 10);
    assert!(first.has_next_page());
    assert!(!first.has_previous_page());

    query.page(3);
    let last = query.execute(None).await.unwrap();
    assert_eq!(last.total_pages, Some(3));
    assert_eq!(names(&last.results), vec!["shirt-21", "shirt-22", "shirt-23"]);
    assert!(!last.has_next_page());
    assert!(last.has_previous_page());
}

#[tokio::test]
async fn test_page_index_sent_zero_based() {
    let (index, mut query) = search_over(numbered(23));
    query.page(2).page_size(5);

    let results = query.execute(None).await.unwrap();
    assert_eq!(names(&results.results)[0], "shirt-06");

    let sent = index.last_query().await.unwrap().page.unwrap();
    assert_eq!((sent.index, sent.size), (1, 5));
}

#[tokio::test]
async fn test_page_zero_is_first_page() {
    let (_, mut query) = search_over(numbered(12));
    query.page(0);

    let results = query.execute(None).await.unwrap();
    assert_eq!(results.page, 1);
    assert_eq!(names(&results.results)[0], "shirt-01");
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let (_, mut query) = search_over(numbered(23));
    query.page(9);

    let results = query.execute(None).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(results.total_results, 23);
    assert_eq!(results.total_pages, Some(3));
}

#[tokio::test]
async fn test_zero_page_size_returns_everything() {
    let (index, mut query) = search_over(numbered(23));
    query.page_size(0);

    let results = query.execute(None).await.unwrap();
    assert_eq!(results.len(), 23);
    assert_eq!(results.total_pages, None);
    assert_eq!(results.page_size, 0);
    assert!(index.last_query().await.unwrap().page.is_none());
}

#[tokio::test]
async fn test_empty_index() {
    let (_, query) = search_over(numbered(0));

    let results = query.execute(Some("shirt")).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(results.total_pages, Some(0));
}
