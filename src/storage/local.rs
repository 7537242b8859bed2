// src/storage/local.rs

//! Page store on the local filesystem.
//!
//! ```text
//! {root}/
//! ├── raw/{key}.json        # StoredPage
//! └── records/{key}.json    # enriched record
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{PageStore, StoredPage};

/// Subdirectory a document lives in.
#[derive(Debug, Clone, Copy)]
enum Area {
    Raw,
    Records,
}

impl Area {
    fn dir(self) -> &'static str {
        match self {
            Area::Raw => "raw",
            Area::Records => "records",
        }
    }
}

/// One JSON document per key under a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Resolve `key` to its document path. Keys become file names, so
    /// separators and dot segments are rejected.
    fn document(&self, area: Area, key: &str) -> Result<PathBuf> {
        let well_formed = !key.is_empty()
            && key != "."
            && key != ".."
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !well_formed {
            return Err(AppError::storage(key, "keys may only contain [A-Za-z0-9._-]"));
        }
        Ok(self.root_dir.join(area.dir()).join(format!("{key}.json")))
    }

    /// Serialize next to the target and rename over it, so readers never
    /// see a half-written document.
    async fn put<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let staging = path.with_extension("json.tmp");

        let mut file = tokio::fs::File::create(&staging).await?;
        file.write_all(&serde_json::to_vec_pretty(value)?).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&staging, path).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl PageStore for LocalStorage {
    async fn save_raw(&self, key: &str, page: &StoredPage) -> Result<()> {
        let path = self.document(Area::Raw, key)?;
        self.put(&path, page).await?;
        log::info!("Stored {} bytes of markup for {} as {}", page.markup.len(), page.url, key);
        Ok(())
    }

    async fn load_raw(&self, key: &str) -> Result<Option<StoredPage>> {
        let path = self.document(Area::Raw, key)?;
        let page = self.get(&path).await?;
        if page.is_none() {
            log::warn!("No raw markup found for {}", key);
        }
        Ok(page)
    }

    async fn save_record(&self, key: &str, record: &Value) -> Result<()> {
        let path = self.document(Area::Records, key)?;
        self.put(&path, record).await?;
        log::info!("Record saved for {}", key);
        Ok(())
    }

    async fn load_record(&self, key: &str) -> Result<Option<Value>> {
        let path = self.document(Area::Records, key)?;
        self.get(&path).await
    }
}
