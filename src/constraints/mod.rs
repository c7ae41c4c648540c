//! Search constraints
//!
//! A constraint restricts results on one label (a property or metadata
//! field). Each kind compiles caller input into the backend's filter
//! structure:
//! - `between_dates`: inclusive range over two Unix-second timestamps
//! - `regex`: exact match of one or more literal strings
//! - `term`: exact quoted-term match of one or more values

mod between_dates;
mod pattern;
mod term;
mod types;

pub use pattern::anchored_literal;
pub use types::{Clause, Comparison, FilterDocument, FilterEntry, FilterValue, Predicate, TimeUnit};

use crate::error::{MindbreezeError, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Closed set of constraint kinds, selected by their wire discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    BetweenDates,
    Regex,
    Term,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 3] = [
        ConstraintKind::BetweenDates,
        ConstraintKind::Regex,
        ConstraintKind::Term,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::BetweenDates => "between_dates",
            ConstraintKind::Regex => "regex",
            ConstraintKind::Term => "term",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintKind {
    type Err = MindbreezeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                MindbreezeError::invalid_argument(format!(
                    "Constraint type does not exist: {}. Please use one of the following: {}",
                    s,
                    Self::ALL.map(|kind| kind.as_str()).join(", ")
                ))
            })
    }
}

/// A constraint on one label, accumulating compiled filter entries
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    kind: ConstraintKind,
    label: String,
    filters: Vec<FilterEntry>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            filters: Vec::new(),
        }
    }

    pub fn between_dates(label: impl Into<String>) -> Self {
        Self::new(ConstraintKind::BetweenDates, label)
    }

    pub fn regex(label: impl Into<String>) -> Self {
        Self::new(ConstraintKind::Regex, label)
    }

    pub fn term(label: impl Into<String>) -> Self {
        Self::new(ConstraintKind::Term, label)
    }

    /// Compile `values` into filter entries and append them
    ///
    /// `between_dates` expects `[from, to]`. `regex` and `term` take a
    /// scalar or an array of scalars and emit one entry per value.
    pub fn create(mut self, values: &Value) -> Result<Self> {
        match self.kind {
            ConstraintKind::BetweenDates => {
                let entry = between_dates::filter(&self.label, values)?;
                self.filters.push(entry);
            }
            ConstraintKind::Regex => {
                for value in scalar_values(self.kind, values)? {
                    self.filters.push(pattern::filter(&self.label, value));
                }
            }
            ConstraintKind::Term => {
                for value in scalar_values(self.kind, values)? {
                    self.filters.push(term::filter(&self.label, value));
                }
            }
        }

        Ok(self)
    }

    pub fn compile(&self) -> FilterDocument {
        FilterDocument {
            label: self.label.clone(),
            filter_base: self.filters.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Coerce a scalar or an array of scalars into strings
fn scalar_values(kind: ConstraintKind, values: &Value) -> Result<Vec<String>> {
    match values {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(|item| scalar_text(kind, item)).collect(),
        other => Ok(vec![scalar_text(kind, other)?]),
    }
}

fn scalar_text(kind: ConstraintKind, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(MindbreezeError::invalid_argument(format!(
            "Value passed to {} constraint must be a string or number, got {}",
            kind, other
        ))),
    }
}
