//! HTTP transport
//!
//! The client never talks to the network directly. It hands a
//! [`PostRequest`] to an [`HttpClient`] and gets back the status code plus
//! the JSON-decoded body.

mod reqwest_client;

pub use reqwest_client::ReqwestClient;

use crate::error::Result;
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Outbound POST
#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

impl PostRequest {
    /// POST with `Content-Type: application/json`
    pub fn json(body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        Self {
            body: body.into(),
            headers,
        }
    }
}

/// Status code and decoded body of one response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// `Value::Null` when the body was empty or not JSON
    pub body: serde_json::Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a raw body, falling back to `null` for empty or non-JSON text
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|e| {
                tracing::warn!("Response body is not valid JSON (status {}): {}", status, e);
                serde_json::Value::Null
            })
        };

        Self { status, body }
    }
}

/// Transport used by [`crate::request::QueryBuilder::send`]
///
/// Timeouts and cancellation are the implementation's concern. Failures
/// before a status arrives are reported as `MindbreezeError::Transport`.
pub trait HttpClient: Send + Sync {
    fn post(&self, url: &str, request: PostRequest) -> Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_request_headers() {
        let request = PostRequest::json("{}");
        assert_eq!(
            request.headers.get(CONTENT_TYPE).map(String::as_str),
            Some(APPLICATION_JSON)
        );
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, json!({})).is_success());
        assert!(HttpResponse::new(204, json!(null)).is_success());
        assert!(!HttpResponse::new(302, json!(null)).is_success());
        assert!(!HttpResponse::new(500, json!(null)).is_success());
    }

    #[test]
    fn test_from_text() {
        assert_eq!(
            HttpResponse::from_text(200, r#"{"a": 1}"#).body,
            json!({"a": 1})
        );
        assert_eq!(HttpResponse::from_text(200, "  ").body, json!(null));
        assert_eq!(HttpResponse::from_text(502, "<html>").body, json!(null));
    }
}
