//! Well-known index field names.
//!
//! Every index Facetry talks to is expected to carry these fields for every
//! document; the predicate builder targets them for free-text, scope, date,
//! template and language clauses.

/// Aggregated full-text content, the default free-text target.
pub const CONTENT: &str = "_content";

/// Ancestor path, as a list of short item ids.
pub const PATH: &str = "_path";

/// Last-updated timestamp.
pub const UPDATED: &str = "__smallupdateddate";

/// Template (type) id, in short form.
pub const TEMPLATE: &str = "_template";

/// Language code.
pub const LANGUAGE: &str = "_language";

/// Item name.
pub const NAME: &str = "_name";

/// All well-known fields.
pub const ALL: [&str; 6] = [CONTENT, PATH, UPDATED, TEMPLATE, LANGUAGE, NAME];

/// Returns `true` if `name` is one of the well-known fields.
pub fn is_well_known(name: &str) -> bool {
    ALL.contains(&name)
}
