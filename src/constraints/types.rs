// Wire shapes of compiled constraints
use serde::Serialize;

/// Compiled constraint as it appears in `user.constraints` or
/// `source_context.constraints`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDocument {
    pub label: String,
    pub filter_base: Vec<FilterEntry>,
}

/// One predicate inside a filter document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterEntry {
    pub label: String,
    #[serde(flatten)]
    pub predicate: Predicate,
    /// Canonical value, used by the backend for display and debugging
    pub value: FilterValue,
}

/// Serialized as either `"and": [...]` or `"regex": "..."`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    And(Vec<Clause>),
    Regex(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Clause {
    /// Numeric comparison, used for date bounds
    Range {
        num: i64,
        cmp: Comparison,
        unit: TimeUnit,
    },
    /// Exact match on a quoted term
    QuotedTerm { label: String, quoted_term: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    #[serde(rename = "GE")]
    GreaterOrEqual,
    #[serde(rename = "LE")]
    LessOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeUnit {
    #[serde(rename = "ms_since_1970")]
    MsSince1970,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Num { num: i64, unit: TimeUnit },
    Str {
        #[serde(rename = "str")]
        text: String,
    },
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Str { text: value.into() }
    }
}
