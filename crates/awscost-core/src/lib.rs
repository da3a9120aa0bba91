//! Core types, aggregation, and utilities for aws-cost
//!
//! This crate holds everything the other aws-cost crates share: the
//! domain types, the cost aggregator, timezone resolution, the
//! `CostSource` seam to the billing API, and the error type.

pub mod aggregation;
pub mod error;
pub mod source;
pub mod timezone;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use aggregation::{Aggregator, PeriodBounds};
pub use error::{AwsCostError, Result};
pub use source::{CostSource, get_total_costs};
pub use timezone::TimezoneConfig;
pub use types::{
    FetchWindow, PeriodTotals, RawCostByService, ReportingPeriod, ServiceBreakdown, ServiceName,
    TotalCosts,
};
