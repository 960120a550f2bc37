//! Field predicates understood by every [`DocumentStore`](super::DocumentStore).
//!
//! Text predicates compare literally. Nothing supplied by a caller is interpreted as a
//! pattern, so a filter can only ever narrow a collection.

use serde_json::Value;

use super::Document;

/// Caller-supplied text kept verbatim alongside its lowercase form, folded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedText {
    text: String,
    folded: String,
}

impl FoldedText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let folded = text.to_lowercase();
        Self { text, folded }
    }

    /// The text as supplied.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }
}

/// Condition applied to a single document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match against a text field.
    Substring(FoldedText),
    /// Case-insensitive match against the whole text field.
    Exact(FoldedText),
    /// Inclusive integer range. At least one bound is always present.
    Range { min: Option<i64>, max: Option<i64> },
}

impl Predicate {
    pub fn substring(needle: impl Into<String>) -> Self {
        Self::Substring(FoldedText::new(needle))
    }

    pub fn exact(expected: impl Into<String>) -> Self {
        Self::Exact(FoldedText::new(expected))
    }

    /// Builds a range predicate, or `None` when neither bound was supplied.
    pub fn range(min: Option<i64>, max: Option<i64>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self::Range { min, max })
    }

    /// Evaluates the predicate against a field value. Missing or mistyped fields never match.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Predicate::Substring(needle) => value
                .and_then(Value::as_str)
                .map(|text| text.to_lowercase().contains(needle.folded()))
                .unwrap_or(false),
            Predicate::Exact(expected) => value
                .and_then(Value::as_str)
                .map(|text| text.to_lowercase() == expected.folded())
                .unwrap_or(false),
            Predicate::Range { min, max } => match value.and_then(Value::as_i64) {
                Some(number) => {
                    min.map_or(true, |low| number >= low) && max.map_or(true, |high| number <= high)
                }
                None => false,
            },
        }
    }
}

/// One predicate bound to the field it constrains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: String,
    pub predicate: Predicate,
}

/// Conjunction of clauses. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.clauses.push(Clause {
            field: field.into(),
            predicate,
        });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Predicate registered for `field`, if any.
    pub fn predicate_for(&self, field: &str) -> Option<&Predicate> {
        self.clauses
            .iter()
            .find(|clause| clause.field == field)
            .map(|clause| &clause.predicate)
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.predicate.matches(document.get(&clause.field)))
    }
}
