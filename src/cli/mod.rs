//! Terminal front end: rate lookup, conversions and first-run setup.

pub mod convert;
pub mod rate;
pub mod setup;
pub mod ui;
