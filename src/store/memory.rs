use crate::core::rate::{RateRecord, RateStore};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// Process-local store; the record is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<RateRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: RateRecord) -> Self {
        Self {
            inner: Mutex::new(Some(record)),
        }
    }
}

#[async_trait]
impl RateStore for MemoryStore {
    async fn load(&self) -> Option<RateRecord> {
        let record = *self.inner.lock().await;
        debug!(found = record.is_some(), "MemoryStore load");
        record
    }

    async fn save(&self, record: &RateRecord) -> Result<()> {
        let mut inner = self.inner.lock().await;
        debug!(date = %record.date, "MemoryStore save");
        *inner = Some(*record);
        Ok(())
    }
}
