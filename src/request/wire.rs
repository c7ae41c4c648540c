// Outbound request document
use super::order::{OrderDirection, OrderField};
use crate::constraints::FilterDocument;
use serde::Serialize;

/// Body POSTed to the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    /// Length of the content snippet, in characters
    pub content_sample_length: u32,
    pub user: UserQuery,
    /// Results per page
    pub count: u32,
    /// Pages listed in `result_pages`, for page navigation
    pub max_page_count: u32,
    pub alternatives_query_spelling_max_estimated_count: u32,
    pub order_direction: OrderDirection,
    pub orderby: OrderField,
    pub properties: Vec<RequestedField>,
    pub facets: Vec<RequestedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_context: Option<SourceContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_pages: Option<ResultPages>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserQuery {
    pub query: QueryExpression,
    pub constraints: Vec<FilterDocument>,
}

/// `{"and": {"unparsed": "..."}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryExpression {
    pub and: UnparsedQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnparsedQuery {
    pub unparsed: String,
}

impl QueryExpression {
    pub fn unparsed(text: impl Into<String>) -> Self {
        Self {
            and: UnparsedQuery {
                unparsed: text.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    Html,
    Value,
}

/// A property or facet to return with each result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestedField {
    pub formats: Vec<Format>,
    pub name: String,
}

impl RequestedField {
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            formats: vec![Format::Html, Format::Value],
            name: name.into(),
        }
    }

    pub fn facet(name: impl Into<String>) -> Self {
        Self {
            formats: vec![Format::Html],
            name: name.into(),
        }
    }
}

/// Datasource scoping, placed outside the user query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceContext {
    pub constraints: FilterDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPages {
    /// Continuation token from the previous response, verbatim
    pub qeng_ids: serde_json::Value,
    pub pages: PageSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSelection {
    pub starts: Vec<u64>,
    pub counts: Vec<u64>,
    pub current_page: bool,
    pub page_number: u64,
}

impl PageSelection {
    /// Selection of the single page `page` (1-based) of `per_page` results
    pub fn single(page: u64, per_page: u32) -> Self {
        let per_page = u64::from(per_page);
        Self {
            starts: vec![page.saturating_sub(1).saturating_mul(per_page)],
            counts: vec![per_page],
            current_page: true,
            page_number: page,
        }
    }
}
