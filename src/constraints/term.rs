use super::types::{Clause, FilterEntry, FilterValue, Predicate};

/// Exact quoted-term match of `term` on `label`
pub fn filter(label: &str, term: String) -> FilterEntry {
    FilterEntry {
        label: label.to_string(),
        predicate: Predicate::And(vec![Clause::QuotedTerm {
            label: label.to_string(),
            quoted_term: term.clone(),
        }]),
        value: FilterValue::text(term),
    }
}
