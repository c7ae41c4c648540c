//! Response normalization
//!
//! Reshapes the backend's nested result document into records, a
//! pagination summary and an optional spelling suggestion, and keeps the
//! session's continuation token in step with what the backend returned.

mod records;
mod suggestion;

pub use records::Record;
pub use suggestion::strip_tags;

use crate::error::{MindbreezeError, Result};
use crate::http::HttpResponse;
use crate::session::{PaginationSession, PaginationToken};
use serde::Serialize;
use serde_json::Value;

/// What to do with the stored continuation token when the backend fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpErrorPolicy {
    /// Leave the token alone so the caller can retry the same page
    #[default]
    KeepToken,
    /// Drop the token; the next paginated request must restart from page 1
    ClearToken,
}

impl HttpErrorPolicy {
    pub fn from_clear_flag(clear_token_on_http_error: bool) -> Self {
        if clear_token_on_http_error {
            Self::ClearToken
        } else {
            Self::KeepToken
        }
    }
}

/// Pagination summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pagination {
    /// `None` when the backend did not say
    pub prev: Option<bool>,
    pub next: Option<bool>,
    /// Estimated total number of matches
    pub total: u64,
}

/// Simplified search result
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NormalizedResponse {
    pub records: Vec<Record>,
    pub pagination: Pagination,
    pub suggestion: Option<String>,
}

impl NormalizedResponse {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct ResponseNormalizer {
    session: PaginationSession,
    policy: HttpErrorPolicy,
}

impl ResponseNormalizer {
    pub fn new(session: PaginationSession, policy: HttpErrorPolicy) -> Self {
        Self { session, policy }
    }

    /// Normalize one HTTP result for the query encoded as `encoded_query`
    ///
    /// # Errors
    /// `Http` for a non-2xx status. Token store failures are propagated.
    pub fn normalize(
        &self,
        encoded_query: &str,
        response: HttpResponse,
    ) -> Result<NormalizedResponse> {
        if !response.is_success() {
            if self.policy == HttpErrorPolicy::ClearToken {
                self.session.clear()?;
            }
            return Err(MindbreezeError::Http {
                status: response.status,
            });
        }

        let mut body = response.body;

        let results = match body.pointer_mut("/resultset/results").map(Value::take) {
            Some(Value::Array(results)) => results,
            _ => {
                tracing::debug!("Response has no result set");
                self.session.clear()?;
                return Ok(NormalizedResponse::default());
            }
        };

        match body.pointer("/resultset/result_pages/qeng_ids") {
            Some(vars) if !vars.is_null() => {
                self.session
                    .store(PaginationToken::new(encoded_query, vars.clone()))?;
            }
            _ => {
                tracing::warn!("Result set carries no continuation token");
                self.session.clear()?;
            }
        }

        let records = records::flatten_results(results);
        let pagination = pagination(&body);
        let suggestion = suggestion::spelling_suggestion(&body);

        tracing::debug!(
            "Normalized {} records (total {}, suggestion {:?})",
            records.len(),
            pagination.total,
            suggestion
        );

        Ok(NormalizedResponse {
            records,
            pagination,
            suggestion,
        })
    }
}

fn pagination(body: &Value) -> Pagination {
    Pagination {
        prev: body.pointer("/resultset/prev_avail").and_then(Value::as_bool),
        next: body.pointer("/resultset/next_avail").and_then(Value::as_bool),
        total: body
            .get("estimated_count")
            .and_then(Value::as_u64)
            .unwrap_or(0),
    }
}
