//! Common test fixtures for Facetry query integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use facetry_core::{FieldBinding, FieldValue, ItemId, SearchItem, SearchResultItem, fields};
use facetry_query::{MemoryIndex, SearchIndex, SearchQuery};

/// Template id shared by every product fixture.
pub fn product_template() -> ItemId {
    "{4F2A9D1C-7B3E-4C55-9A80-1D2E3F4A5B6C}".parse().unwrap()
}

/// Template id for non-product fixtures.
pub fn article_template() -> ItemId {
    "{0B1C2D3E-4F50-4617-8293-A4B5C6D7E8F9}".parse().unwrap()
}

/// A catalog product: the common item shape plus a few facetable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub item: SearchResultItem,
    pub color: String,
    pub size: String,
    pub tags: Vec<String>,
}

static PRODUCT_FIELDS: [FieldBinding; 8] = [
    FieldBinding::indexed("name", fields::NAME),
    FieldBinding::indexed("language", fields::LANGUAGE),
    FieldBinding::indexed("template_id", fields::TEMPLATE),
    FieldBinding::indexed("content", fields::CONTENT),
    FieldBinding::indexed("updated", fields::UPDATED),
    FieldBinding::indexed("color", "color_s"),
    FieldBinding::new("size"),
    FieldBinding::indexed("tags", "tags_sm"),
];

impl SearchItem for Product {
    fn bindings() -> &'static [FieldBinding] {
        &PRODUCT_FIELDS
    }

    fn field(&self, index_field: &str) -> Option<FieldValue> {
        match index_field {
            "color_s" => Some(FieldValue::text(&self.color)),
            "size" => Some(FieldValue::text(&self.size)),
            "tags_sm" => Some(FieldValue::terms(self.tags.iter().cloned())),
            _ => self.item.field(index_field),
        }
    }

    fn score_mut(&mut self) -> Option<&mut f32> {
        self.item.score_mut()
    }
}

/// A product with no tags.
pub fn product(name: &str, color: &str, size: &str) -> Product {
    Product {
        item: SearchResultItem::new(name, product_template())
            .with_content(format!("{name} in {color}, size {size}")),
        color: color.to_string(),
        size: size.to_string(),
        tags: Vec::new(),
    }
}

/// A product carrying `tags`.
pub fn tagged(name: &str, color: &str, tags: &[&str]) -> Product {
    Product {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..product(name, color, "M")
    }
}

/// Six shirts: three red, two green, one blue.
pub fn shirts() -> Vec<Product> {
    vec![
        product("oxford", "red", "L"),
        product("flannel", "red", "M"),
        product("linen", "red", "L"),
        product("polo", "green", "S"),
        product("henley", "green", "L"),
        product("tee", "blue", "M"),
    ]
}

/// `count` numbered products, all matching "shirt".
pub fn numbered(count: usize) -> Vec<Product> {
    (1..=count)
        .map(|n| product(&format!("shirt-{n:02}"), "white", "M"))
        .collect()
}

/// An index over `documents` together with a search bound to it.
pub fn search_over<T: SearchItem>(documents: Vec<T>) -> (MemoryIndex<T>, SearchQuery<T>) {
    let index = MemoryIndex::with_documents("search_test_index", documents);
    let shared: Arc<dyn SearchIndex<T>> = Arc::new(index.clone());
    (index, SearchQuery::new(shared))
}

/// Names of the returned items, in result order.
pub fn names(results: &[Product]) -> Vec<&str> {
    results.iter().map(|p| p.item.name.as_str()).collect()
}
