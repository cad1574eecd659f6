//! Base search result item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields;
use crate::ids::ItemId;
use crate::item::{FieldBinding, FieldValue, SearchItem};

static BASE_FIELDS: [FieldBinding; 5] = [
    FieldBinding::indexed("name", fields::NAME),
    FieldBinding::indexed("language", fields::LANGUAGE),
    FieldBinding::indexed("template_id", fields::TEMPLATE),
    FieldBinding::indexed("content", fields::CONTENT),
    FieldBinding::indexed("updated", fields::UPDATED),
];

/// The common shape of an indexed content item.
///
/// Domain types usually embed this and delegate the well-known fields to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// Item id.
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Language code, e.g. `"en"`.
    pub language: String,
    /// Template (type) id.
    pub template_id: ItemId,
    /// Ancestor ids from the root down to and including the item itself.
    #[serde(default)]
    pub paths: Vec<ItemId>,
    /// Last-updated timestamp.
    pub updated: DateTime<Utc>,
    /// Full-text content.
    #[serde(default)]
    pub content: String,
    /// Relevance score stamped by the last search, 0.0 before.
    #[serde(default)]
    pub score: f32,
}

impl SearchResultItem {
    /// Create an item with a fresh id, `"en"` language and no ancestors.
    pub fn new(name: impl Into<String>, template_id: ItemId) -> Self {
        let id = ItemId::new();
        Self {
            id,
            name: name.into(),
            language: "en".to_string(),
            template_id,
            paths: vec![id],
            updated: Utc::now(),
            content: String::new(),
            score: 0.0,
        }
    }

    /// Place the item under `ancestors` (root first).
    pub fn with_ancestors(mut self, ancestors: &[ItemId]) -> Self {
        self.paths = ancestors.to_vec();
        self.paths.push(self.id);
        self
    }

    /// Set the full-text content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the last-updated timestamp.
    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = updated;
        self
    }
}

impl SearchItem for SearchResultItem {
    fn bindings() -> &'static [FieldBinding] {
        &BASE_FIELDS
    }

    fn field(&self, index_field: &str) -> Option<FieldValue> {
        match index_field {
            fields::NAME => Some(FieldValue::text(&self.name)),
            fields::LANGUAGE => Some(FieldValue::text(&self.language)),
            fields::TEMPLATE => Some(FieldValue::text(self.template_id.short())),
            fields::CONTENT => Some(FieldValue::text(&self.content)),
            fields::UPDATED => Some(FieldValue::Date(self.updated)),
            fields::PATH => Some(FieldValue::terms(self.paths.iter().map(ItemId::short))),
            _ => None,
        }
    }

    fn score_mut(&mut self) -> Option<&mut f32> {
        Some(&mut self.score)
    }
}
