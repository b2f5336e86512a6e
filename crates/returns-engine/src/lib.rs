//! Time-series return engine: nearest-date price matching and annualized
//! (CAGR) returns over the standard horizons, plus the pluggable
//! scheme-name resolver used for fund NAV lookups.

pub mod cagr;
pub mod resolver;

pub use cagr::{cagr, trailing_returns, HORIZONS, MATCH_TOLERANCE_DAYS};
pub use resolver::FuzzySchemeResolver;
