//! aws-cost - Cost report for an AWS account
//!
//! This library provides functionality to:
//! - Resolve AWS credentials from flags, profiles, or an assumed role
//! - Fetch daily per-service costs from Cost Explorer
//! - Aggregate them into yesterday, last 7 days, this month, and last month
//! - Render the result as tables, plain text, or JSON
//! - Post a summary to a Slack channel
//!
//! # Examples
//!
//! ```no_run
//! use awscost::{
//!     Aggregator, AwsOptions, CostExplorerSource, TimezoneConfig, account_alias,
//!     report::collect, resolve_session,
//! };
//!
//! #[tokio::main]
//! async fn main() -> awscost::Result<()> {
//!     let session = resolve_session(&AwsOptions::default()).await?;
//!     let aggregator = Aggregator::from_timezone(&TimezoneConfig::default());
//!     let source = CostExplorerSource::new(&session);
//!
//!     let report = collect(&source, account_alias(&session), &aggregator).await?;
//!     println!("{}: ${:.2} yesterday", report.account, report.costs.totals.yesterday);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod progress;
pub mod report;

// Re-export commonly used types
pub use awscost_aws::{AwsOptions, AwsSession, CostExplorerSource, account_alias, resolve_session};
pub use awscost_core::{
    Aggregator, AwsCostError, CostSource, PeriodTotals, RawCostByService, ReportingPeriod,
    Result, ServiceName, TimezoneConfig, TotalCosts,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
