//! Failure modes of the rate lookup

use thiserror::Error;

/// Upstream failures. Callers treat every variant the same way for fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Upstream rate provider unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Malformed response from rate provider: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateError {
    /// A refresh failed and there was no record to fall back on.
    #[error("Unable to fetch or cache exchange rate.")]
    NoCacheAvailable {
        #[source]
        source: FetchError,
    },
}
