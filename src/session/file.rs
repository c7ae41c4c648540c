//! File-backed token store
//!
//! One JSON file per session under `<data_dir>/tokens/`, named by the BLAKE3
//! hash of the session key so arbitrary keys map to safe file names.

use super::{PaginationToken, TokenStore};
use crate::error::{MindbreezeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk record
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    key: String,
    stored_at: DateTime<Utc>,
    token: PaginationToken,
}

pub struct FileTokenStore {
    tokens_dir: PathBuf,
}

impl FileTokenStore {
    /// Create a store under `data_dir`, creating `tokens/` if needed
    pub fn new(data_dir: &Path) -> Result<Self> {
        let tokens_dir = data_dir.join("tokens");
        fs::create_dir_all(&tokens_dir).map_err(|e| MindbreezeError::Io {
            source: e,
            context: format!(
                "Failed to create tokens directory: {}",
                tokens_dir.display()
            ),
        })?;

        Ok(Self { tokens_dir })
    }

    pub fn tokens_dir(&self) -> &Path {
        &self.tokens_dir
    }

    fn token_path(&self, key: &str) -> PathBuf {
        let hash = blake3::hash(key.as_bytes()).to_hex();
        self.tokens_dir.join(format!("{}.json", hash))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<PaginationToken>> {
        let path = self.token_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| MindbreezeError::Io {
            source: e,
            context: format!("Failed to read token file: {}", path.display()),
        })?;
        let stored: StoredToken =
            serde_json::from_str(&content).map_err(|e| MindbreezeError::Json {
                source: e,
                context: format!("Failed to deserialize token file: {}", path.display()),
            })?;

        Ok(Some(stored.token))
    }

    fn set(&self, key: &str, token: PaginationToken) -> Result<()> {
        let path = self.token_path(key);
        let stored = StoredToken {
            key: key.to_string(),
            stored_at: Utc::now(),
            token,
        };
        let content = serde_json::to_string_pretty(&stored).map_err(|e| MindbreezeError::Json {
            source: e,
            context: "Failed to serialize continuation token".to_string(),
        })?;

        // Write to a temporary file, then rename over the old token
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| MindbreezeError::Io {
            source: e,
            context: format!("Failed to write token file: {}", temp_path.display()),
        })?;
        fs::rename(&temp_path, &path).map_err(|e| MindbreezeError::Io {
            source: e,
            context: format!(
                "Failed to rename temp token to final location: {} -> {}",
                temp_path.display(),
                path.display()
            ),
        })?;

        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        let path = self.token_path(key);
        if !path.exists() {
            return Ok(());
        }

        fs::remove_file(&path).map_err(|e| MindbreezeError::Io {
            source: e,
            context: format!("Failed to delete token file: {}", path.display()),
        })
    }
}
