use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const SPELLING_ALTERNATIVE: &str = "query_spelling";

fn tag_regex() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static tag pattern"))
}

/// Remove markup tags, keeping the text between them
pub fn strip_tags(html: &str) -> String {
    tag_regex().replace_all(html, "").into_owned()
}

/// First spelling alternative offered by the backend, without markup
///
/// Only the first `query_spelling` alternative is considered; if it has no
/// entries there is no suggestion.
pub fn spelling_suggestion(body: &Value) -> Option<String> {
    let alternatives = body.get("alternatives")?.as_array()?;
    let spelling = alternatives
        .iter()
        .find(|alt| alt.get("name").and_then(Value::as_str) == Some(SPELLING_ALTERNATIVE))?;

    let entry = spelling.get("entries")?.as_array()?.first()?;
    entry.get("html").and_then(Value::as_str).map(strip_tags)
}
