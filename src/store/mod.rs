pub mod file;
pub mod kv;
pub mod memory;

use crate::core::config::{StoreBackend, StoreConfig};
use crate::core::rate::{RateRecord, RateStore};
use anyhow::Result;
pub use file::JsonFileStore;
pub use kv::FjallStore;
pub use memory::MemoryStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Opens the backend selected in the config.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn RateStore>> {
    let store: Arc<dyn RateStore> = match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory rate store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::File => {
            let path = config.resolved_path()?;
            info!(path = %path.display(), "Using JSON file rate store");
            Arc::new(JsonFileStore::new(path))
        }
        StoreBackend::Fjall => {
            let path = config.resolved_path()?;
            info!(path = %path.display(), "Using fjall rate store");
            Arc::new(FjallStore::open(&path)?)
        }
    };
    Ok(store)
}

/// Drops persisted records that could not have come from a real quote.
fn validated(record: RateRecord) -> Option<RateRecord> {
    match RateRecord::new(record.rate, record.date) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "Ignoring invalid persisted rate");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_each_backend() {
        let dir = tempdir().unwrap();
        let seed = RateRecord::new(4000.0, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();

        for (backend, path) in [
            (StoreBackend::Memory, None),
            (StoreBackend::File, Some(dir.path().join("rate.json"))),
            (StoreBackend::Fjall, Some(dir.path().join("fjall"))),
        ] {
            let config = StoreConfig {
                backend,
                path,
                seed: None,
            };
            let store = open_store(&config).unwrap();
            assert!(store.load().await.is_none());
            store.save(&seed).await.unwrap();
            assert_eq!(store.load().await, Some(seed));
        }
    }
}
