//! Terminal output formatting for aws-cost
//!
//! This crate provides the fancy table, plain text, and JSON renderings
//! of an aggregated cost report.

pub mod output;

pub use output::{
    FancyFormatter, JsonFormatter, OutputFormatter, OutputKind, TextFormatter, format_currency,
    get_formatter, round2,
};
