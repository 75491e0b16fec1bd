//! Daily cached exchange rate with stale fallback.
//!
//! A record dated today is served as is. Anything older triggers one upstream
//! fetch; if that fails the old record is served with a warning, and only
//! when there is no record at all does the lookup fail.

use crate::core::error::{FetchError, RateError};
use crate::core::rate::{Clock, CurrencyPair, RateProvider, RateRecord, RateStore};
use crate::core::response::RateOutcome;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub struct RateService {
    store: Arc<dyn RateStore>,
    provider: Arc<dyn RateProvider>,
    clock: Arc<dyn Clock>,
    pair: CurrencyPair,
    refresh_lock: Mutex<()>,
}

impl RateService {
    pub fn new(
        store: Arc<dyn RateStore>,
        provider: Arc<dyn RateProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            provider,
            clock,
            pair: CurrencyPair::usd_cop(),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub async fn get_rate(&self) -> Result<RateOutcome, RateError> {
        let today = self.clock.today();

        if let Some(record) = self.same_day_record(today).await {
            return Ok(RateOutcome::Cached(record));
        }

        // Only one refresh runs at a time; whoever waited re-reads the store
        // first so a burst of misses costs a single upstream call.
        let _guard = self.refresh_lock.lock().await;
        let previous = self.store.load().await;
        if let Some(record) = previous.filter(|r| r.is_from(today)) {
            debug!(date = %record.date, "Rate refreshed by a concurrent request");
            return Ok(RateOutcome::Cached(record));
        }

        match self.fetch_record(today).await {
            Ok(record) => {
                // Unsaved rates are not memoized; a broken store refetches on every request.
                if let Err(e) = self.store.save(&record).await {
                    warn!(error = %e, "Failed to persist refreshed rate");
                }
                info!(
                    pair = %self.pair,
                    rate = record.rate,
                    date = %record.date,
                    "Refreshed exchange rate"
                );
                Ok(RateOutcome::Fresh(record))
            }
            Err(cause) => match previous {
                Some(record) => {
                    warn!(
                        error = %cause,
                        date = %record.date,
                        "Refresh failed, serving stale rate"
                    );
                    Ok(RateOutcome::Stale { record, cause })
                }
                None => {
                    error!(error = %cause, "Refresh failed and no cached rate exists");
                    Err(RateError::NoCacheAvailable { source: cause })
                }
            },
        }
    }

    /// Persists `seed` when nothing has been stored yet.
    pub async fn seed_if_empty(&self, seed: RateRecord) -> Result<bool> {
        let _guard = self.refresh_lock.lock().await;
        if self.store.load().await.is_some() {
            return Ok(false);
        }
        self.store.save(&seed).await?;
        info!(rate = seed.rate, date = %seed.date, "Seeded exchange rate store");
        Ok(true)
    }

    async fn same_day_record(&self, today: NaiveDate) -> Option<RateRecord> {
        let record = self.store.load().await?;
        if record.is_from(today) {
            debug!(date = %record.date, "Cache HIT for exchange rate");
            Some(record)
        } else {
            debug!(date = %record.date, %today, "Cache MISS for exchange rate");
            None
        }
    }

    async fn fetch_record(&self, today: NaiveDate) -> Result<RateRecord, FetchError> {
        let rate = self.provider.fetch_rate(&self.pair).await?;
        RateRecord::new(rate, today).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}
