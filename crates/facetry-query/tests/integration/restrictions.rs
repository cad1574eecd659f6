//! Integration tests for structural restrictions: scope, dates, templates
//! and language.

use chrono::{TimeZone, Utc};
use facetry_core::{ItemId, SearchResultItem};
use facetry_query::Predicate;

use crate::common::{Product, article_template, names, product, product_template, search_over};

fn sorted(results: &[Product]) -> Vec<&str> {
    let mut found = names(results);
    found.sort_unstable();
    found
}

#[tokio::test]
async fn test_root_scope_limits_to_descendants() {
    let root = ItemId::new();
    let mens = ItemId::new();
    let elsewhere = ItemId::new();

    let mut inside = product("oxford", "red", "L");
    inside.item = inside.item.with_ancestors(&[root, mens]);
    let mut shallow = product("polo", "green", "S");
    shallow.item = shallow.item.with_ancestors(&[root]);
    let mut outside = product("tee", "blue", "M");
    outside.item = outside.item.with_ancestors(&[elsewhere]);

    let (_, mut query) = search_over(vec![inside, shallow, outside]);

    query.root_scope(root);
    assert_eq!(sorted(&query.execute(None).await.unwrap().results), vec!["oxford", "polo"]);

    query.root_scope(mens);
    assert_eq!(sorted(&query.execute(None).await.unwrap().results), vec!["oxford"]);

    query.root_scope(ItemId::NULL);
    assert_eq!(query.execute(None).await.unwrap().total_results, 3);
}

#[tokio::test]
async fn test_date_range_is_inclusive() {
    let day = |d: u32| Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap();
    let dated = |name: &str, d: u32| {
        let mut p = product(name, "red", "M");
        p.item = p.item.with_updated(day(d));
        p
    };
    let (_, mut query) = search_over(vec![
        dated("early", 1),
        dated("start", 10),
        dated("middle", 15),
        dated("end", 20),
        dated("late", 28),
    ]);

    query.date_range(Some(day(10)), Some(day(20)));
    assert_eq!(
        sorted(&query.execute(None).await.unwrap().results),
        vec!["end", "middle", "start"]
    );

    query.date_range(Some(day(15)), None);
    assert_eq!(
        sorted(&query.execute(None).await.unwrap().results),
        vec!["end", "late", "middle"]
    );

    query.date_range(None, None);
    assert_eq!(query.execute(None).await.unwrap().total_results, 5);
}

#[tokio::test]
async fn test_template_restriction() {
    let mut article = product("lookbook", "red", "M");
    article.item = SearchResultItem::new("lookbook", article_template());
    let other = ItemId::new();
    let mut misc = product("giftcard", "none", "-");
    misc.item = SearchResultItem::new("giftcard", other);

    let (_, mut query) = search_over(vec![product("oxford", "red", "L"), article, misc]);

    query.restrict_template(product_template());
    assert_eq!(names(&query.execute(None).await.unwrap().results), vec!["oxford"]);

    query.restrict_template(article_template());
    assert_eq!(
        sorted(&query.execute(None).await.unwrap().results),
        vec!["lookbook", "oxford"]
    );
}

#[tokio::test]
async fn test_language_restriction() {
    let in_language = |name: &str, language: &str| {
        let mut p = product(name, "red", "M");
        p.item = p.item.with_language(language);
        p
    };
    let (_, mut query) = search_over(vec![
        in_language("shirt", "en"),
        in_language("skjorte", "da"),
        in_language("hemd", "de"),
    ]);

    assert_eq!(names(&query.execute(None).await.unwrap().results), vec!["shirt"]);

    query.language("da");
    assert_eq!(names(&query.execute(None).await.unwrap().results), vec!["skjorte"]);

    query.restrict_to_current_language(false);
    assert_eq!(query.execute(None).await.unwrap().total_results, 3);
}

#[tokio::test]
async fn test_must_and_could_conditions() {
    let (_, mut query) = search_over(crate::common::shirts());

    query
        .must(Predicate::equals("size", "L"))
        .could(Predicate::equals("color_s", "green"))
        .could(Predicate::equals("color_s", "blue"));
    assert_eq!(names(&query.execute(None).await.unwrap().results), vec!["henley"]);

    query.must(!Predicate::equals("color_s", "green"));
    assert!(query.execute(None).await.unwrap().is_empty());
}
