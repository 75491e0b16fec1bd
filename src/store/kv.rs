use crate::core::rate::{RateRecord, RateStore};
use crate::store::validated;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::{debug, warn};

const PARTITION_NAME: &str = "exchange_rate";
const CURRENT_KEY: &str = "current";

/// Embedded LSM store holding the record under a single key.
pub struct FjallStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(db_path)
            .with_context(|| format!("Failed to create directory: {}", db_path.display()))?;

        let keyspace = Config::new(db_path)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", db_path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
            .context("Failed to open exchange rate partition")?;

        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn read(&self) -> Result<Option<RateRecord>> {
        match self.partition.get(CURRENT_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RateStore for FjallStore {
    async fn load(&self) -> Option<RateRecord> {
        match self.read() {
            Ok(Some(record)) => {
                debug!(date = %record.date, "FjallStore HIT");
                validated(record)
            }
            Ok(None) => {
                debug!("FjallStore MISS");
                None
            }
            Err(e) => {
                warn!(error = %e, "FjallStore read error");
                None
            }
        }
    }

    async fn save(&self, record: &RateRecord) -> Result<()> {
        self.partition
            .insert(CURRENT_KEY, serde_json::to_vec(record)?)
            .context("Failed to write exchange rate")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush exchange rate")?;
        debug!(date = %record.date, "FjallStore PUT");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(rate: f64, day: u32) -> RateRecord {
        RateRecord::new(rate, NaiveDate::from_ymd_opt(2024, 2, day).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_fjall_store_load_save() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();

        // Initially, store is empty
        assert!(store.load().await.is_none());

        store.save(&record(3875.5, 1)).await.unwrap();
        assert_eq!(store.load().await, Some(record(3875.5, 1)));

        // Last write wins
        store.save(&record(3880.0, 2)).await.unwrap();
        assert_eq!(store.load().await, Some(record(3880.0, 2)));
    }

    #[tokio::test]
    async fn test_fjall_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FjallStore::open(dir.path()).unwrap();
            store.save(&record(3901.25, 3)).await.unwrap();
        }

        let reopened = FjallStore::open(dir.path()).unwrap();
        assert_eq!(reopened.load().await, Some(record(3901.25, 3)));
    }
}
