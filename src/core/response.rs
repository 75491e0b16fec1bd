//! JSON bodies returned by the exchange rate endpoint

use crate::core::error::{FetchError, RateError};
use crate::core::rate::RateRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const STALE_WARNING: &str = "Using cached value due to fetch error.";

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    /// Fetched from upstream during this call.
    Fresh(RateRecord),
    /// Served from a record fetched earlier the same day.
    Cached(RateRecord),
    /// Refresh failed, so an older record is served instead.
    Stale { record: RateRecord, cause: FetchError },
}

impl RateOutcome {
    pub fn record(&self) -> &RateRecord {
        match self {
            RateOutcome::Fresh(record) | RateOutcome::Cached(record) => record,
            RateOutcome::Stale { record, .. } => record,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RateOutcome::Stale { .. })
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            RateOutcome::Fresh(_) => "fresh",
            RateOutcome::Cached(_) => "cached",
            RateOutcome::Stale { .. } => "stale",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResponse {
    pub rate: f64,
    pub date: NaiveDate,
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RateOutcome> for RateResponse {
    fn from(outcome: RateOutcome) -> Self {
        match outcome {
            RateOutcome::Fresh(record) => RateResponse {
                rate: record.rate,
                date: record.date,
                cached: false,
                error: None,
            },
            RateOutcome::Cached(record) => RateResponse {
                rate: record.rate,
                date: record.date,
                cached: true,
                error: None,
            },
            RateOutcome::Stale { record, .. } => RateResponse {
                rate: record.rate,
                date: record.date,
                cached: true,
                error: Some(STALE_WARNING.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&RateError> for ErrorResponse {
    fn from(err: &RateError) -> Self {
        ErrorResponse {
            error: err.to_string(),
        }
    }
}
