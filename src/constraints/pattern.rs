// Exact-match regex constraint
use super::types::{FilterEntry, FilterValue, Predicate};

/// Anchored pattern that matches `literal` and nothing else
///
/// Every regex metacharacter in `literal` is escaped, so user text is never
/// interpreted as a pattern.
pub fn anchored_literal(literal: &str) -> String {
    format!("^{}$", regex::escape(literal))
}

pub fn filter(label: &str, literal: String) -> FilterEntry {
    FilterEntry {
        label: label.to_string(),
        predicate: Predicate::Regex(anchored_literal(&literal)),
        value: FilterValue::text(literal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_plain_value() {
        assert_eq!(anchored_literal("Web:Gazette"), "^Web:Gazette$");
    }

    #[test]
    fn test_metacharacters_match_literally() {
        let samples = [
            "a.b",
            "(x|y)*",
            "price: $5+",
            "[brackets]{2}",
            r"back\slash",
            "^caret",
            r"\Equote\E",
        ];

        for sample in samples {
            let re = Regex::new(&anchored_literal(sample)).unwrap();
            assert!(re.is_match(sample), "{} should match itself", sample);
            assert!(!re.is_match(&format!("{}x", sample)));
            assert!(!re.is_match(&format!("x{}", sample)));
        }
    }

    #[test]
    fn test_dot_is_not_a_wildcard() {
        let re = Regex::new(&anchored_literal("a.b")).unwrap();
        assert!(!re.is_match("axb"));
    }

    #[test]
    fn test_entry_keeps_raw_value() {
        let entry = filter("title", "a+b".to_string());
        assert_eq!(entry.value, FilterValue::text("a+b"));
        assert_eq!(entry.predicate, Predicate::Regex(r"^a\+b$".to_string()));
    }
}
