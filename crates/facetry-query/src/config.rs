//! Query configuration.
//!
//! [`QueryConfig`] holds everything that shapes a search apart from the
//! search terms and facet declarations. It is plain data: serde
//! (de)serializable with per-field defaults, and loadable from TOML.
//!
//! ```toml
//! fields_to_search = ["title", "_content"]
//! fuzziness = 0.6
//! page_size = 20
//! restrict_templates = ["{76036F5E-CBCE-46D1-AF0A-4143F9B557AA}"]
//!
//! [[must]]
//! leaf = { equals = { field = "color_s", value = "red" } }
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use facetry_core::{Error, ItemId, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::predicate::Predicate;

/// Configuration of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Fields eligible for free-text matching; empty means the content field.
    #[serde(default)]
    pub fields_to_search: Vec<String>,

    /// Conditions that must all hold.
    #[serde(default)]
    pub must: Vec<Predicate>,

    /// Conditions of which at least one must hold when any are given.
    #[serde(default)]
    pub could: Vec<Predicate>,

    /// Earliest last-updated date (inclusive); `None` is unbounded.
    #[serde(
        default,
        deserialize_with = "deserialize_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<DateTime<Utc>>,

    /// Latest last-updated date (inclusive); `None` is unbounded.
    #[serde(
        default,
        deserialize_with = "deserialize_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<DateTime<Utc>>,

    /// Only items below this ancestor; `None` or [`ItemId::NULL`] for no scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_scope: Option<ItemId>,

    /// Allowed template ids; empty allows every template.
    #[serde(default)]
    pub restrict_templates: Vec<ItemId>,

    /// Only items in [`language`](Self::language).
    #[serde(default = "default_true")]
    pub restrict_to_current_language: bool,

    /// The current language code.
    #[serde(default = "default_language")]
    pub language: String,

    /// 0 for exact substring matching, above 0 for fuzzy matching.
    #[serde(default)]
    pub fuzziness: f32,

    /// One-based page number.
    #[serde(default = "default_page")]
    pub page: usize,

    /// Items per page; 0 disables paging.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Facet buckets with fewer hits are dropped by the index.
    #[serde(default = "default_min_facet_count")]
    pub min_facet_count: usize,
}

/// Accept a date as an RFC 3339 string or as a native TOML offset datetime.
fn deserialize_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<toml::Value>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(toml::Value::String(text)) => text,
        Some(toml::Value::Datetime(datetime)) => datetime.to_string(),
        Some(_) => return Err(D::Error::custom("expected an RFC 3339 date and time")),
    };
    DateTime::parse_from_rfc3339(&text)
        .map(|date| Some(date.with_timezone(&Utc)))
        .map_err(|e| D::Error::custom(format!("invalid date '{text}': {e}")))
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    10
}

fn default_min_facet_count() -> usize {
    1
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            fields_to_search: Vec::new(),
            must: Vec::new(),
            could: Vec::new(),
            from: None,
            to: None,
            root_scope: None,
            restrict_templates: Vec::new(),
            restrict_to_current_language: default_true(),
            language: default_language(),
            fuzziness: 0.0,
            page: default_page(),
            page_size: default_page_size(),
            min_facet_count: default_min_facet_count(),
        }
    }
}

impl QueryConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// The inclusive date bounds, with unset ends at the representable limits.
    pub fn date_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.from.unwrap_or(DateTime::<Utc>::MIN_UTC),
            self.to.unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Whether the date bounds narrow the full representable range.
    pub fn has_date_restriction(&self) -> bool {
        let (from, to) = self.date_bounds();
        from > DateTime::<Utc>::MIN_UTC || to < DateTime::<Utc>::MAX_UTC
    }

    /// The scope root, unless unset or the null identifier.
    pub fn scope(&self) -> Option<ItemId> {
        self.root_scope.filter(|id| !id.is_null())
    }

    /// Fuzziness clamped to be non-negative.
    pub fn effective_fuzziness(&self) -> f32 {
        if self.fuzziness.is_finite() && self.fuzziness > 0.0 {
            self.fuzziness
        } else {
            0.0
        }
    }

    /// Whether paging is enabled.
    pub fn is_paged(&self) -> bool {
        self.page_size > 0
    }

    /// Zero-based page index; page 0 is treated as page 1.
    pub fn page_index(&self) -> usize {
        self.page.max(1) - 1
    }
}

// ============================================================================
// Tests
// ============================================================================
