//! Typed search items and their field bindings.
//!
//! A result type declares which of its fields can be bound to facets and
//! conditions through a static table of [`FieldBinding`]s, and exposes field
//! values to index implementations by index field name. This replaces
//! runtime inspection of field expressions: every binding is resolved once,
//! when a facet is declared.
//!
//! ```
//! use facetry_core::{FieldBinding, FieldValue, SearchItem};
//!
//! #[derive(Clone)]
//! struct Product {
//!     color: String,
//!     size: String,
//! }
//!
//! static PRODUCT_FIELDS: [FieldBinding; 2] = [
//!     FieldBinding::indexed("color", "color_s"),
//!     FieldBinding::new("size"),
//! ];
//!
//! impl SearchItem for Product {
//!     fn bindings() -> &'static [FieldBinding] {
//!         &PRODUCT_FIELDS
//!     }
//!
//!     fn field(&self, index_field: &str) -> Option<FieldValue> {
//!         match index_field {
//!             "color_s" => Some(FieldValue::text(&self.color)),
//!             "size" => Some(FieldValue::text(&self.size)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! assert_eq!(Product::binding("color").unwrap().index_field(), "color_s");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A field value as seen by an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Single text value.
    Text(String),
    /// Multi-valued field (ancestor ids, tags, ...).
    Terms(Vec<String>),
    /// Timestamp.
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Create a multi-valued field.
    pub fn terms<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Terms(values.into_iter().map(Into::into).collect())
    }

    /// The text value, if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The timestamp, if this is a date field.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Every string held by this value; dates yield nothing.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(s) => vec![s.as_str()],
            FieldValue::Terms(terms) => terms.iter().map(String::as_str).collect(),
            FieldValue::Date(_) => Vec::new(),
        }
    }
}

/// Declaration of one bindable field on an item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldBinding {
    name: &'static str,
    index_name: Option<&'static str>,
}

impl FieldBinding {
    /// A field indexed under its own name.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            index_name: None,
        }
    }

    /// A field carrying an explicit index-field mapping.
    pub const fn indexed(name: &'static str, index_name: &'static str) -> Self {
        Self {
            name,
            index_name: Some(index_name),
        }
    }

    /// The raw field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The explicit index-field mapping, if any.
    pub fn index_mapping(&self) -> Option<&'static str> {
        self.index_name
    }

    /// The name the index knows this field by.
    pub fn index_field(&self) -> &'static str {
        self.index_name.unwrap_or(self.name)
    }
}

/// A typed result shape that can be searched, filtered and faceted.
pub trait SearchItem: Clone + Send + Sync + 'static {
    /// Static declaration table of bindable fields.
    fn bindings() -> &'static [FieldBinding];

    /// Look up a binding by raw field name.
    fn binding(name: &str) -> Option<&'static FieldBinding> {
        Self::bindings().iter().find(|b| b.name() == name)
    }

    /// Read a field by its index name.
    ///
    /// Used by index implementations to evaluate conditions and aggregate
    /// facets. Unknown names return `None`.
    fn field(&self, index_field: &str) -> Option<FieldValue>;

    /// Mutable relevance score slot, for types that carry one.
    ///
    /// When present, the index score of each hit is written here before the
    /// item is handed back to the caller.
    fn score_mut(&mut self) -> Option<&mut f32> {
        None
    }
}
