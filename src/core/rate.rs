//! Exchange rate abstractions and core types

use crate::core::error::FetchError;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The last successfully fetched quote and the UTC day it was fetched on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub rate: f64,
    pub date: NaiveDate,
}

impl RateRecord {
    pub fn new(rate: f64, date: NaiveDate) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(anyhow!("Exchange rate must be a positive number, got {rate}"));
        }
        Ok(Self { rate, date })
    }

    pub fn is_from(&self, day: NaiveDate) -> bool {
        self.date == day
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn usd_cop() -> Self {
        Self {
            base: "USD".to_string(),
            quote: "COP".to_string(),
        }
    }

    /// Key under which quote providers report this pair, e.g. `USDCOP`.
    pub fn quote_key(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<f64, FetchError>;
}

/// Holds at most one record. Writes replace whatever was there.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Unreadable or corrupt state is reported as `None`.
    async fn load(&self) -> Option<RateRecord>;
    async fn save(&self, record: &RateRecord) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Calendar days are always computed in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct UtcClock;

impl Clock for UtcClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
