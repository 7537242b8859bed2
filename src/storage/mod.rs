// src/storage/mod.rs

//! Storage abstractions for scraped pages and extracted records.
//!
//! Pages are keyed by a caller-assigned identifier. [`page_key`] derives a
//! stable one from the page URL when the caller has none.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── raw/                  # Raw markup, one file per page
//! │   └── {key}.json
//! └── records/              # Extracted records, one file per page
//!     └── {key}.json
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Raw markup captured for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPage {
    pub url: String,
    pub markup: String,
    pub stored_at: DateTime<Utc>,
}

impl StoredPage {
    pub fn new(url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markup: markup.into(),
            stored_at: Utc::now(),
        }
    }
}

/// Trait for page storage backends.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Save raw markup under `key`, replacing any previous capture.
    async fn save_raw(&self, key: &str, page: &StoredPage) -> Result<()>;

    /// Load raw markup saved under `key`.
    async fn load_raw(&self, key: &str) -> Result<Option<StoredPage>>;

    /// Save the extracted record for `key`.
    async fn save_record(&self, key: &str, record: &Value) -> Result<()>;

    /// Load the extracted record for `key`.
    async fn load_record(&self, key: &str) -> Result<Option<Value>>;
}

/// Stable storage key for a URL: the first 16 hex digits of its SHA-256.
pub fn page_key(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(&digest[..8])
}
