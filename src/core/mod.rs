//! Core business logic abstractions

pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod rate;
pub mod response;
pub mod service;

// Re-export main types for cleaner imports
pub use error::{FetchError, RateError};
pub use rate::{Clock, CurrencyPair, RateProvider, RateRecord, RateStore, UtcClock};
pub use response::{ErrorResponse, RateOutcome, RateResponse};
pub use service::RateService;
