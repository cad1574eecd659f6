//! Item identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a content item, template or scope root.
///
/// The nil UUID is the "null identifier": a scope root of [`ItemId::NULL`]
/// means no scope restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// The null identifier.
    pub const NULL: ItemId = ItemId(Uuid::nil());

    /// Creates a new random item ID.
    ///
    /// # Examples
    ///
    /// ```
    /// use facetry_core::ItemId;
    ///
    /// let id = ItemId::new();
    /// assert!(!id.is_null());
    /// ```
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an item ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns `true` for the null identifier.
    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }

    /// Index representation: 32 lowercase hex digits without separators.
    ///
    /// This is the form stored in path and template fields.
    pub fn short(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.hyphenated().to_string().to_uppercase())
    }
}

impl From<Uuid> for ItemId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::str::FromStr for ItemId {
    type Err = uuid::Error;

    /// Accepts braced, hyphenated or simple forms, in either case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
