use crate::core::rate::{RateRecord, RateStore};
use crate::store::validated;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Keeps the record as a single JSON object, `{"rate": .., "date": ".."}`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<RateRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        let record = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(record))
    }
}

#[async_trait]
impl RateStore for JsonFileStore {
    async fn load(&self) -> Option<RateRecord> {
        match self.read().await {
            Ok(Some(record)) => {
                debug!(path = %self.path.display(), date = %record.date, "Loaded cached rate");
                validated(record)
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "No cached rate file");
                None
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable rate cache");
                None
            }
        }
    }

    async fn save(&self, record: &RateRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write next to the target and rename so readers never see a partial file.
        let tmp_path = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string(record)?;
        tokio::fs::write(&tmp_path, contents)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), date = %record.date, "Saved rate");
        Ok(())
    }
}
