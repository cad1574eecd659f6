//! Integration tests for facet aggregation and refinement.

use facetry_core::Error;
use facetry_query::FacetDefinition;

use crate::common::{Product, names, search_over, shirts, tagged};

fn buckets(results: &facetry_query::SearchResults<Product>, facet: &str) -> Vec<(String, u64, bool)> {
    results
        .facet(facet)
        .expect("declared facet is always present")
        .values
        .iter()
        .map(|v| (v.value.clone(), v.count, v.selected))
        .collect()
}

fn bucket(value: &str, count: u64, selected: bool) -> (String, u64, bool) {
    (value.to_string(), count, selected)
}

#[tokio::test]
async fn test_facets_count_whole_match_set() {
    let (_, mut query) = search_over(shirts());
    query
        .page_size(2)
        .facet(FacetDefinition::new("color").unwrap())
        .facet(FacetDefinition::new("size").unwrap());

    let results = query.execute(None).await.unwrap();

    assert_eq!(results.total_results, 6);
    assert_eq!(results.len(), 2);
    assert_eq!(
        buckets(&results, "color_s"),
        vec![
            bucket("red", 3, false),
            bucket("green", 2, false),
            bucket("blue", 1, false),
        ]
    );
    assert_eq!(
        buckets(&results, "size"),
        vec![bucket("L", 3, false), bucket("M", 2, false), bucket("S", 1, false)]
    );
}

#[tokio::test]
async fn test_selecting_a_value_narrows_results() {
    let (_, mut query) = search_over(shirts());
    query
        .facet(FacetDefinition::new("color").unwrap().with_selected(["red"]))
        .facet(FacetDefinition::new("size").unwrap());

    let results = query.execute(None).await.unwrap();

    assert_eq!(results.total_results, 3);
    let mut found = names(&results.results);
    found.sort_unstable();
    assert_eq!(found, vec!["flannel", "linen", "oxford"]);
    assert_eq!(buckets(&results, "color_s"), vec![bucket("red", 3, true)]);
    assert_eq!(
        buckets(&results, "size"),
        vec![bucket("L", 2, false), bucket("M", 1, false)]
    );
}

#[tokio::test]
async fn test_selections_across_facets_combine() {
    let (_, mut query) = search_over(shirts());
    query
        .facet(FacetDefinition::new("color").unwrap().with_selected(["red"]))
        .facet(FacetDefinition::new("size").unwrap().with_selected(["L"]));

    let results = query.execute(None).await.unwrap();

    let mut found = names(&results.results);
    found.sort_unstable();
    assert_eq!(found, vec!["linen", "oxford"]);
}

#[tokio::test]
async fn test_selected_flags_round_trip_on_multi_valued_field() {
    let (_, mut query) = search_over(vec![
        tagged("a", "red", &["cotton", "summer"]),
        tagged("b", "red", &["cotton", "summer", "sale"]),
        tagged("c", "red", &["cotton"]),
        tagged("d", "red", &["summer"]),
    ]);
    query.facet(
        FacetDefinition::new("tags")
            .unwrap()
            .with_selected(["cotton", "summer"]),
    );

    let results = query.execute(None).await.unwrap();

    assert_eq!(results.total_results, 2);
    assert_eq!(
        buckets(&results, "tags_sm"),
        vec![
            bucket("cotton", 2, true),
            bucket("summer", 2, true),
            bucket("sale", 1, false),
        ]
    );
    let tags = results.facet("tags_sm").unwrap();
    assert_eq!(tags.selected().count(), 2);
}

#[tokio::test]
async fn test_deselecting_restores_full_set() {
    let (_, mut query) = search_over(shirts());
    query.facet(FacetDefinition::new("color").unwrap().with_selected(["green"]));
    assert_eq!(query.execute(None).await.unwrap().total_results, 2);

    assert!(query.facet_mut("color_s").unwrap().deselect("green"));
    let results = query.execute(None).await.unwrap();
    assert_eq!(results.total_results, 6);
    assert!(results.facet("color_s").unwrap().selected().next().is_none());
}

#[tokio::test]
async fn test_min_facet_count_drops_small_buckets() {
    let (_, mut query) = search_over(shirts());
    query
        .min_facet_count(2)
        .facet(FacetDefinition::new("color").unwrap());

    let results = query.execute(None).await.unwrap();

    assert_eq!(
        buckets(&results, "color_s"),
        vec![bucket("red", 3, false), bucket("green", 2, false)]
    );
}

#[tokio::test]
async fn test_display_names() {
    let (_, mut query) = search_over(shirts());
    query.facet(
        FacetDefinition::new("color")
            .unwrap()
            .with_display_name("Colour")
            .with_value_to_display_name(|value: &str| value.to_uppercase()),
    );

    let results = query.execute(None).await.unwrap();
    let color = results.facet("color_s").unwrap();

    assert_eq!(color.definition().display_name, "Colour");
    assert_eq!(color.value("blue").unwrap().display_value(), "BLUE");
}

#[tokio::test]
async fn test_results_keep_selection_snapshot() {
    let (_, mut query) = search_over(shirts());
    query.facet(FacetDefinition::new("color").unwrap().with_selected(["red"]));
    let before = query.execute(None).await.unwrap();

    query.facet_mut("color_s").unwrap().clear_selection();
    let after = query.execute(None).await.unwrap();

    assert_eq!(before.facet("color_s").unwrap().definition().filter(), ["red"]);
    assert!(before.facet("color_s").unwrap().value("red").unwrap().selected);
    assert!(after.facet("color_s").unwrap().definition().filter().is_empty());
    assert_eq!(after.total_results, 6);
}

#[test]
fn test_unbound_field_cannot_be_faceted() {
    let err = FacetDefinition::<Product>::new("weight").unwrap_err();
    assert!(matches!(err, Error::UnboundField { ref field, .. } if field == "weight"));
    assert!(err.is_configuration());
}
