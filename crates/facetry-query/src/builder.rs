//! Predicate composition.
//!
//! [`PredicateBuilder`] turns a [`QueryConfig`] and optional search terms into
//! one composite [`Predicate`]. The combination policy is fixed:
//!
//! 1. **Optional-match group**: the OR of every `could` condition and, when
//!    search terms are given, one free-text condition per searched field (or
//!    one on the content field when no fields are configured). Free-text
//!    conditions are `contains` at fuzziness 0 and `fuzzy` above it.
//!    The group is omitted when it has no members.
//! 2. AND every `must` condition.
//! 3. AND `path contains scope` when a scope root is set.
//! 4. AND `updated ∈ [from, to]` when the bounds narrow the full range.
//! 5. AND the OR of `template == t` for each allowed template, when any are
//!    given.
//! 6. AND `language == current` when restricted to the current language.
//!
//! Every clause that does not apply is left out, so the empty configuration
//! without language restriction builds [`Predicate::All`].

use facetry_core::fields;

use crate::config::QueryConfig;
use crate::predicate::Predicate;

/// Builds the base match predicate for a search.
#[derive(Debug, Clone, Copy)]
pub struct PredicateBuilder<'a> {
    config: &'a QueryConfig,
}

impl<'a> PredicateBuilder<'a> {
    /// Create a builder over a configuration.
    pub fn new(config: &'a QueryConfig) -> Self {
        Self { config }
    }

    /// Compose the predicate. Blank search terms count as no terms.
    pub fn build(&self, search_terms: Option<&str>) -> Predicate {
        let clauses = [
            self.optional_group(search_terms),
            Some(Predicate::all_of(self.config.must.iter().cloned())),
            self.scope_clause(),
            self.date_clause(),
            self.template_clause(),
            self.language_clause(),
        ];
        Predicate::all_of(clauses.into_iter().flatten())
    }

    /// Step 1: `could` conditions and free-text conditions, OR-ed.
    pub fn optional_group(&self, search_terms: Option<&str>) -> Option<Predicate> {
        let mut members: Vec<Predicate> = self.config.could.clone();
        if let Some(terms) = search_terms.filter(|t| !t.trim().is_empty()) {
            members.extend(self.text_conditions(terms));
        }
        if members.is_empty() {
            None
        } else {
            Some(Predicate::any_of(members))
        }
    }

    /// One free-text condition per searched field.
    pub fn text_conditions(&self, terms: &str) -> Vec<Predicate> {
        let fuzziness = self.config.effective_fuzziness();
        let condition = |field: &str| {
            if fuzziness > 0.0 {
                Predicate::fuzzy(field, terms, fuzziness)
            } else {
                Predicate::contains(field, terms)
            }
        };

        if self.config.fields_to_search.is_empty() {
            vec![condition(fields::CONTENT)]
        } else {
            self.config
                .fields_to_search
                .iter()
                .map(|field| condition(field.as_str()))
                .collect()
        }
    }

    /// Step 3: `path contains scope`.
    pub fn scope_clause(&self) -> Option<Predicate> {
        self.config
            .scope()
            .map(|root| Predicate::contains(fields::PATH, root.short()))
    }

    /// Step 4: `updated ∈ [from, to]`.
    pub fn date_clause(&self) -> Option<Predicate> {
        if !self.config.has_date_restriction() {
            return None;
        }
        let (from, to) = self.config.date_bounds();
        Some(Predicate::between(fields::UPDATED, from, to))
    }

    /// Step 5: the item's template is one of the allowed ones.
    pub fn template_clause(&self) -> Option<Predicate> {
        if self.config.restrict_templates.is_empty() {
            return None;
        }
        Some(Predicate::any_of(
            self.config
                .restrict_templates
                .iter()
                .map(|template| Predicate::equals(fields::TEMPLATE, template.short())),
        ))
    }

    /// Step 6: `language == current`.
    pub fn language_clause(&self) -> Option<Predicate> {
        self.config
            .restrict_to_current_language
            .then(|| Predicate::equals(fields::LANGUAGE, self.config.language.as_str()))
    }
}

// ============================================================================
// Tests
// ============================================================================
