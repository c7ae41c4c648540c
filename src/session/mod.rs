//! Pagination session state
//!
//! The backend issues a continuation token (`qeng_ids`) with every page of
//! results. Requests for page 2 and beyond must echo it back, and only for
//! the query that produced it. Tokens live in a [`TokenStore`] keyed by a
//! caller-chosen session id, so they survive across requests (and, with the
//! file store, across processes).

mod file;
mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::error::{MindbreezeError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Continuation token bound to the encoded query it was issued for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationToken {
    /// Encoded query string at issue time
    pub query: String,
    /// Opaque backend value, sent back verbatim under `result_pages.qeng_ids`
    pub vars: serde_json::Value,
}

impl PaginationToken {
    pub fn new(query: impl Into<String>, vars: serde_json::Value) -> Self {
        Self {
            query: query.into(),
            vars,
        }
    }
}

/// Storage for continuation tokens, keyed by session id
///
/// Implementations synchronize internally; the client assumes at most one
/// in-flight paginated sequence per key.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<PaginationToken>>;

    fn set(&self, key: &str, token: PaginationToken) -> Result<()>;

    fn clear(&self, key: &str) -> Result<()>;
}

/// A token store bound to one session key
#[derive(Clone)]
pub struct PaginationSession {
    store: Arc<dyn TokenStore>,
    key: String,
}

impl PaginationSession {
    pub fn new(store: Arc<dyn TokenStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Session backed by a fresh in-memory store
    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()), key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> Result<Option<PaginationToken>> {
        self.store.get(&self.key)
    }

    pub fn store(&self, token: PaginationToken) -> Result<()> {
        tracing::debug!("Storing continuation token for session {}", self.key);
        self.store.set(&self.key, token)
    }

    pub fn clear(&self) -> Result<()> {
        tracing::debug!("Clearing continuation token for session {}", self.key);
        self.store.clear(&self.key)
    }

    /// Token vars for `encoded_query`, required when requesting page 2+
    pub fn vars_for(&self, encoded_query: &str) -> Result<serde_json::Value> {
        let token = self.token()?.ok_or_else(|| {
            MindbreezeError::pagination_state("On page 2+ of search and QENG variables not set.")
        })?;

        if token.query != encoded_query {
            return Err(MindbreezeError::pagination_state(
                "On page 2+ of search and QENG variables do not match queried term.",
            ));
        }

        Ok(token.vars)
    }
}

impl std::fmt::Debug for PaginationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationSession")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
