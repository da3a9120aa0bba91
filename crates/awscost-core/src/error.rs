//! Error types for aws-cost
//!
//! This module defines the error type shared by every aws-cost crate.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! The cost aggregator never produces an error; every variant here
//! originates in a collaborator (credentials, the billing API or
//! notification delivery).
//!
//! # Example
//!
//! ```
//! use awscost_core::error::{AwsCostError, Result};
//!
//! fn parse_amount(raw: &str) -> Result<f64> {
//!     raw.trim()
//!         .parse()
//!         .map_err(|_| AwsCostError::InvalidAmount(raw.to_string()))
//! }
//!
//! assert_eq!(parse_amount(" 1.5 ").unwrap(), 1.5);
//! assert!(parse_amount("n/a").is_err());
//! ```

use thiserror::Error;

/// Main error type for aws-cost operations
#[derive(Error, Debug)]
pub enum AwsCostError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Credentials are missing, incomplete, or could not be resolved
    #[error("{0}")]
    Credentials(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A call to the AWS API failed
    #[error("AWS API error: {0}")]
    Api(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// A cost amount could not be parsed as a number
    #[error("Invalid cost amount: {0}")]
    InvalidAmount(String),

    /// Unknown reporting period name
    #[error("Invalid period '{0}': must be one of \"yesterday\", \"last7Days\", \"thisMonth\", or \"lastMonth\"")]
    InvalidPeriod(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The chat service rejected a notification
    #[error("Notification failed: {0}")]
    Notification(String),
}

/// Convenience type alias for Results in aws-cost
pub type Result<T> = std::result::Result<T, AwsCostError>;
