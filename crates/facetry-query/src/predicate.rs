//! Boolean predicate algebra over typed search items.
//!
//! A [`Predicate`] is a tree of AND/OR/NOT nodes over leaf [`Condition`]s.
//! Leaves reference index field names, so the same tree can be evaluated
//! in memory ([`Predicate::matches`]) or translated by an index client into
//! its native boolean query.
//!
//! ```
//! use facetry_query::Predicate;
//!
//! let p = Predicate::equals("color", "red").and(Predicate::contains("_content", "castle"));
//! assert_eq!(p.to_string(), r#"(color == "red" AND _content contains "castle")"#);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use facetry_core::{FieldValue, SearchItem};
use serde::{Deserialize, Serialize};

/// A leaf condition on one index field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Field equals the value exactly.
    Equals {
        /// Index field name
        field: String,
        /// Expected value
        value: String,
    },
    /// Field contains the term (substring for text, membership for lists).
    Contains {
        /// Index field name
        field: String,
        /// Term to look for
        term: String,
    },
    /// Field approximately matches the term.
    Fuzzy {
        /// Index field name
        field: String,
        /// Term to look for
        term: String,
        /// Minimum similarity in `(0, 1]`
        threshold: f32,
    },
    /// Date field lies in `[from, to]`, both ends inclusive.
    Between {
        /// Index field name
        field: String,
        /// Lower bound (inclusive)
        from: DateTime<Utc>,
        /// Upper bound (inclusive)
        to: DateTime<Utc>,
    },
}

impl Condition {
    /// The index field this condition targets.
    pub fn field(&self) -> &str {
        match self {
            Condition::Equals { field, .. }
            | Condition::Contains { field, .. }
            | Condition::Fuzzy { field, .. }
            | Condition::Between { field, .. } => field,
        }
    }

    /// Returns `true` for free-text conditions (contains / fuzzy).
    pub fn is_text(&self) -> bool {
        matches!(self, Condition::Contains { .. } | Condition::Fuzzy { .. })
    }

    /// Evaluate against one field value.
    pub fn matches_value(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Condition::Equals { value: expected, .. }, _) => {
                value.strings().iter().any(|s| *s == expected.as_str())
            }
            (Condition::Contains { term, .. }, FieldValue::Text(text)) => {
                text.to_lowercase().contains(&term.to_lowercase())
            }
            (Condition::Contains { term, .. }, FieldValue::Terms(terms)) => {
                let term = term.to_lowercase();
                terms.iter().any(|t| t.to_lowercase() == term)
            }
            (Condition::Fuzzy { term, threshold, .. }, _) => value
                .strings()
                .iter()
                .any(|text| fuzzy_similarity(text, term) >= threshold.min(1.0)),
            (Condition::Between { from, to, .. }, FieldValue::Date(date)) => {
                from <= date && date <= to
            }
            _ => false,
        }
    }

    /// Evaluate against an item.
    pub fn matches<T: SearchItem>(&self, item: &T) -> bool {
        item.field(self.field())
            .is_some_and(|value| self.matches_value(&value))
    }
}

/// Similarity of `term` to the best-matching tokens of `text`, in `[0, 1]`.
///
/// Each word of the term is compared with every token of the text using
/// normalized Levenshtein similarity; the result is the weakest of the
/// per-word best scores. A verbatim (case-insensitive) occurrence scores 1.
pub fn fuzzy_similarity(text: &str, term: &str) -> f32 {
    let text = text.to_lowercase();
    let term = term.to_lowercase();
    if term.trim().is_empty() {
        return 0.0;
    }
    if text.contains(&term) {
        return 1.0;
    }

    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    term.split_whitespace()
        .map(|word| {
            tokens
                .iter()
                .map(|token| strsim::normalized_levenshtein(token, word))
                .fold(0.0_f64, f64::max)
        })
        .fold(1.0_f64, f64::min) as f32
}

/// A composite boolean match expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Always true.
    All,
    /// Always false.
    Nothing,
    /// Every clause must hold.
    And(Vec<Predicate>),
    /// At least one clause must hold.
    Or(Vec<Predicate>),
    /// The clause must not hold.
    Not(Box<Predicate>),
    /// A single field condition.
    Leaf(Condition),
}

impl Predicate {
    /// `field == value`
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Leaf(Condition::Equals {
            field: field.into(),
            value: value.into(),
        })
    }

    /// `field contains term`
    pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
        Predicate::Leaf(Condition::Contains {
            field: field.into(),
            term: term.into(),
        })
    }

    /// `field ~ term` with a minimum similarity.
    pub fn fuzzy(field: impl Into<String>, term: impl Into<String>, threshold: f32) -> Self {
        Predicate::Leaf(Condition::Fuzzy {
            field: field.into(),
            term: term.into(),
            threshold,
        })
    }

    /// `field ∈ [from, to]`
    pub fn between(field: impl Into<String>, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Predicate::Leaf(Condition::Between {
            field: field.into(),
            from,
            to,
        })
    }

    /// Conjunction of all clauses.
    ///
    /// Nested conjunctions are flattened and `All` clauses dropped; any
    /// `Nothing` clause makes the whole conjunction `Nothing`. No clauses at
    /// all yields `All`.
    pub fn all_of<I: IntoIterator<Item = Predicate>>(clauses: I) -> Self {
        let mut flat = Vec::new();
        for clause in clauses {
            match clause {
                Predicate::All => {}
                Predicate::Nothing => return Predicate::Nothing,
                Predicate::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        collapse(flat, Predicate::All, Predicate::And)
    }

    /// Disjunction of all clauses.
    ///
    /// Nested disjunctions are flattened and `Nothing` clauses dropped; any
    /// `All` clause makes the whole disjunction `All`. No clauses at all
    /// yields `Nothing`.
    pub fn any_of<I: IntoIterator<Item = Predicate>>(clauses: I) -> Self {
        let mut flat = Vec::new();
        for clause in clauses {
            match clause {
                Predicate::Nothing => {}
                Predicate::All => return Predicate::All,
                Predicate::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        collapse(flat, Predicate::Nothing, Predicate::Or)
    }

    /// `self AND other`
    pub fn and(self, other: Predicate) -> Self {
        Predicate::all_of([self, other])
    }

    /// `self OR other`
    pub fn or(self, other: Predicate) -> Self {
        Predicate::any_of([self, other])
    }

    /// Returns `true` if this predicate is the constant `All`.
    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }

    /// Every index field referenced anywhere in the tree.
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Predicate::All | Predicate::Nothing => {}
            Predicate::And(clauses) | Predicate::Or(clauses) => {
                for clause in clauses {
                    clause.collect_fields(out);
                }
            }
            Predicate::Not(inner) => inner.collect_fields(out),
            Predicate::Leaf(condition) => {
                out.insert(condition.field());
            }
        }
    }

    /// Leaf conditions that are not under a negation.
    pub fn positive_conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_positive(&mut out);
        out
    }

    fn collect_positive<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Predicate::And(clauses) | Predicate::Or(clauses) => {
                for clause in clauses {
                    clause.collect_positive(out);
                }
            }
            Predicate::Leaf(condition) => out.push(condition),
            Predicate::All | Predicate::Nothing | Predicate::Not(_) => {}
        }
    }

    /// Evaluate the predicate against an item.
    pub fn matches<T: SearchItem>(&self, item: &T) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Nothing => false,
            Predicate::And(clauses) => clauses.iter().all(|c| c.matches(item)),
            Predicate::Or(clauses) => clauses.iter().any(|c| c.matches(item)),
            Predicate::Not(inner) => !inner.matches(item),
            Predicate::Leaf(condition) => condition.matches(item),
        }
    }
}

fn collapse(
    mut flat: Vec<Predicate>,
    empty: Predicate,
    wrap: fn(Vec<Predicate>) -> Predicate,
) -> Predicate {
    match flat.len() {
        0 => empty,
        1 => flat.pop().unwrap_or(empty),
        _ => wrap(flat),
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        match self {
            Predicate::All => Predicate::Nothing,
            Predicate::Nothing => Predicate::All,
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Equals { field, value } => write!(f, "{field} == {value:?}"),
            Condition::Contains { field, term } => write!(f, "{field} contains {term:?}"),
            Condition::Fuzzy {
                field,
                term,
                threshold,
            } => write!(f, "{field} ~ {term:?} ({threshold})"),
            Condition::Between { field, from, to } => {
                write!(f, "{field} in [{}, {}]", from.to_rfc3339(), to.to_rfc3339())
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => write!(f, "TRUE"),
            Predicate::Nothing => write!(f, "FALSE"),
            Predicate::And(clauses) => write_joined(f, clauses, " AND "),
            Predicate::Or(clauses) => write_joined(f, clauses, " OR "),
            Predicate::Not(inner) => write!(f, "NOT {inner}"),
            Predicate::Leaf(condition) => write!(f, "{condition}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, clauses: &[Predicate], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{clause}")?;
    }
    write!(f, ")")
}

// ============================================================================
// Tests
// ============================================================================
