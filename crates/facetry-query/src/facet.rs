//! Facet declarations and their aggregated values.
//!
//! A [`FacetDefinition`] names one bindable field of the result type, carries
//! the values the caller has selected as refinements, and optionally a
//! transform from raw bucket values to display names. After a search runs,
//! each definition gets a [`FacetResult`] listing its [`FacetValue`] buckets.
//!
//! Selected values are drill-down filters: [`FacetDefinition::create_filter_expression`]
//! turns each of them into an equality condition that narrows the base query.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use facetry_core::{Error, FieldBinding, Result, SearchItem};

use crate::predicate::Predicate;

/// Transform from a raw bucket value to its display name.
pub type DisplayFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Declares one facet over result type `T`.
pub struct FacetDefinition<T> {
    /// Human label for the facet.
    pub display_name: String,
    facet_name: &'static str,
    binding: &'static FieldBinding,
    filter: Vec<String>,
    value_to_display_name: Option<DisplayFn>,
    _item: PhantomData<fn() -> T>,
}

impl<T: SearchItem> FacetDefinition<T> {
    /// Declare a facet on the field `field_name` of `T`.
    ///
    /// The facet name is resolved here, once: the field's explicit index
    /// mapping if it has one, otherwise the field name itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnboundField`] if `T` does not bind `field_name`.
    pub fn new(field_name: &str) -> Result<Self> {
        T::binding(field_name)
            .map(Self::from_binding)
            .ok_or_else(|| Error::unbound_field::<T, _>(field_name))
    }

    /// Declare a facet on an already resolved binding.
    pub fn from_binding(binding: &'static FieldBinding) -> Self {
        Self {
            display_name: binding.name().to_string(),
            facet_name: binding.index_field(),
            binding,
            filter: Vec::new(),
            value_to_display_name: None,
            _item: PhantomData,
        }
    }
}

impl<T> FacetDefinition<T> {
    /// Set the human label.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the raw value → display name transform.
    pub fn with_value_to_display_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.value_to_display_name = Some(Arc::new(f));
        self
    }

    /// Pre-select refinement values.
    pub fn with_selected<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.select(value);
        }
        self
    }

    /// The index field name this facet aggregates on.
    pub fn facet_name(&self) -> &str {
        self.facet_name
    }

    /// The bound field.
    pub fn binding(&self) -> &'static FieldBinding {
        self.binding
    }

    /// Currently selected refinement values, in selection order.
    pub fn filter(&self) -> &[String] {
        &self.filter
    }

    /// Select a refinement value. Selecting twice has no further effect.
    pub fn select(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !self.filter.contains(&value) {
            self.filter.push(value);
        }
    }

    /// Remove a refinement value. Returns `true` if it was selected.
    pub fn deselect(&mut self, value: &str) -> bool {
        let before = self.filter.len();
        self.filter.retain(|v| v != value);
        self.filter.len() != before
    }

    /// Drop all refinement values.
    pub fn clear_selection(&mut self) {
        self.filter.clear();
    }

    /// Whether `value` is currently selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.filter.iter().any(|v| v == value)
    }

    /// Equality condition `field == value` for a selected value.
    pub fn create_filter_expression(&self, value: &str) -> Predicate {
        Predicate::equals(self.facet_name, value)
    }

    /// Display form of a raw bucket value.
    pub fn display_value(&self, value: &str) -> String {
        match &self.value_to_display_name {
            Some(f) => f(value),
            None => value.to_string(),
        }
    }
}

impl<T> Clone for FacetDefinition<T> {
    fn clone(&self) -> Self {
        Self {
            display_name: self.display_name.clone(),
            facet_name: self.facet_name,
            binding: self.binding,
            filter: self.filter.clone(),
            value_to_display_name: self.value_to_display_name.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> fmt::Debug for FacetDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetDefinition")
            .field("display_name", &self.display_name)
            .field("facet_name", &self.facet_name)
            .field("filter", &self.filter)
            .field("has_display_fn", &self.value_to_display_name.is_some())
            .finish()
    }
}

/// One aggregated bucket of a facet.
pub struct FacetValue<T> {
    /// Raw bucket value as returned by the index.
    pub value: String,
    /// Aggregate hit count, as reported by the index.
    pub count: u64,
    /// Whether the value was selected when the results were mapped.
    pub selected: bool,
    definition: Arc<FacetDefinition<T>>,
}

impl<T> FacetValue<T> {
    /// Build a bucket; `selected` is derived from the definition's filter.
    pub fn new(value: impl Into<String>, count: u64, definition: Arc<FacetDefinition<T>>) -> Self {
        let value = value.into();
        let selected = definition.is_selected(&value);
        Self {
            value,
            count,
            selected,
            definition,
        }
    }

    /// The owning facet declaration.
    pub fn definition(&self) -> &FacetDefinition<T> {
        &self.definition
    }

    /// Display form of the value.
    pub fn display_value(&self) -> String {
        self.definition.display_value(&self.value)
    }
}

impl<T> Clone for FacetValue<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            count: self.count,
            selected: self.selected,
            definition: Arc::clone(&self.definition),
        }
    }
}

impl<T> fmt::Debug for FacetValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetValue")
            .field("facet", &self.definition.facet_name)
            .field("value", &self.value)
            .field("count", &self.count)
            .field("selected", &self.selected)
            .finish()
    }
}

/// The buckets computed for one facet declaration.
pub struct FacetResult<T> {
    definition: Arc<FacetDefinition<T>>,
    /// Buckets in the order the index returned them.
    pub values: Vec<FacetValue<T>>,
}

impl<T> FacetResult<T> {
    /// A result with no buckets.
    pub fn empty(definition: Arc<FacetDefinition<T>>) -> Self {
        Self {
            definition,
            values: Vec::new(),
        }
    }

    /// The declaration these buckets belong to, as it was at execution time.
    pub fn definition(&self) -> &FacetDefinition<T> {
        &self.definition
    }

    /// Shared handle on the declaration snapshot.
    pub fn definition_arc(&self) -> Arc<FacetDefinition<T>> {
        Arc::clone(&self.definition)
    }

    /// The facet's index field name.
    pub fn facet_name(&self) -> &str {
        self.definition.facet_name()
    }

    /// The selected buckets.
    pub fn selected(&self) -> impl Iterator<Item = &FacetValue<T>> {
        self.values.iter().filter(|v| v.selected)
    }

    /// Look up a bucket by raw value.
    pub fn value(&self, value: &str) -> Option<&FacetValue<T>> {
        self.values.iter().find(|v| v.value == value)
    }
}

impl<T> Clone for FacetResult<T> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            values: self.values.clone(),
        }
    }
}

impl<T> fmt::Debug for FacetResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetResult")
            .field("facet", &self.definition.facet_name)
            .field("values", &self.values)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
