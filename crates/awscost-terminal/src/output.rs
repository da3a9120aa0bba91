//! Output formatting module for aws-cost
//!
//! This module provides formatters for displaying an aggregated cost report:
//! - Fancy format with colored headings and tables for interactive terminals
//! - Text format for plain logs and pipes
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use awscost_core::types::{PeriodTotals, ServiceName, TotalCosts};
//! use awscost_terminal::output::{OutputKind, get_formatter};
//!
//! let costs = TotalCosts::default().with_service(
//!     ServiceName::from("Amazon EC2"),
//!     PeriodTotals { last_month: 30.0, this_month: 11.0, last_7_days: 7.7, yesterday: 1.1 },
//! );
//!
//! let formatter = get_formatter(OutputKind::Text, false);
//! let output = formatter.format_costs("my-account", &costs, true);
//! assert!(output.contains("  Yesterday: $1.10"));
//! ```

use awscost_core::types::{ReportingPeriod, ServiceName, TotalCosts};
use colored::*;
use prettytable::{Table, format, row};
use serde_json::{Map, Value, json};

/// Trait for output formatters
///
/// Implementations render the aggregated costs for one account. When
/// `summary_only` is set, only the grand totals are shown.
pub trait OutputFormatter {
    /// Format the cost report for an account
    fn format_costs(&self, account: &str, costs: &TotalCosts, summary_only: bool) -> String;
}

/// Which formatter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Colored tables
    #[default]
    Fancy,
    /// Pretty printed JSON
    Json,
    /// Plain indented text
    Text,
}

/// Format currency with dollar sign and two decimals
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Round to two decimal places
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Plain text formatter
///
/// Produces an indented listing without colors or box drawing, suitable
/// for logs and piping into other tools.
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn format_costs(&self, account: &str, costs: &TotalCosts, summary_only: bool) -> String {
        let mut lines = vec![
            String::new(),
            format!("Account: {account}"),
            String::new(),
            "Totals:".to_string(),
        ];

        for period in ReportingPeriod::ALL {
            lines.push(format!(
                "  {}: {}",
                period.label(),
                format_currency(costs.totals.get(period))
            ));
        }

        if !summary_only {
            lines.push(String::new());
            lines.push("Breakdown:".to_string());
            for service in costs.totals_by_service.services() {
                lines.push(format!("  {service}:"));
                for period in ReportingPeriod::ALL {
                    lines.push(format!(
                        "    {}: {}",
                        period.label(),
                        format_currency(costs.totals_by_service.cost(period, service))
                    ));
                }
            }
        }

        lines.join("\n")
    }
}

/// JSON formatter for machine-readable output
///
/// Keys follow the camelCase period names (`lastMonth`, `thisMonth`,
/// `last7Days`, `yesterday`) and every amount is rounded to cents.
pub struct JsonFormatter;

impl JsonFormatter {
    fn period_object<F>(value_of: F) -> Value
    where
        F: Fn(ReportingPeriod) -> Value,
    {
        let mut object = Map::new();
        for period in ReportingPeriod::ALL {
            object.insert(period.key().to_string(), value_of(period));
        }
        Value::Object(object)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_costs(&self, account: &str, costs: &TotalCosts, summary_only: bool) -> String {
        let mut output = json!({
            "account": account,
            "totals": Self::period_object(|period| json!(round2(costs.totals.get(period)))),
        });

        if !summary_only {
            output["totalsByService"] = Self::period_object(|period| {
                let services: Map<String, Value> = costs
                    .totals_by_service
                    .get(period)
                    .iter()
                    .map(|(service, cost)| (service.to_string(), json!(round2(*cost))))
                    .collect();
                Value::Object(services)
            });
        }

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
    }
}

/// Table formatter for interactive terminals
///
/// Shows a colored heading, a summary table of the four period totals,
/// and a per-service table ordered by last month's cost.
pub struct FancyFormatter {
    /// Whether to use colored output
    pub colored_output: bool,
}

impl FancyFormatter {
    /// Create a new FancyFormatter
    ///
    /// Colors are disabled when `no_color` is set or `NO_COLOR` is present
    /// in the environment.
    pub fn new(no_color: bool) -> Self {
        Self {
            colored_output: !no_color && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.colored_output {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn section(&self, text: &str) -> String {
        if self.colored_output {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Services with any cost, most expensive last month first
    fn ranked_services(costs: &TotalCosts) -> Vec<&ServiceName> {
        let breakdown = &costs.totals_by_service;
        let mut services: Vec<&ServiceName> = breakdown
            .services()
            .into_iter()
            .filter(|service| {
                ReportingPeriod::ALL
                    .iter()
                    .any(|period| breakdown.cost(*period, service) != 0.0)
            })
            .collect();

        services.sort_by(|a, b| {
            let a_cost = breakdown.cost(ReportingPeriod::LastMonth, a);
            let b_cost = breakdown.cost(ReportingPeriod::LastMonth, b);
            b_cost.total_cmp(&a_cost).then_with(|| a.cmp(b))
        });
        services
    }

    fn summary_table(costs: &TotalCosts) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Period", b -> "Cost"]);

        for period in ReportingPeriod::ALL {
            table.add_row(row![
                period.label(),
                r -> format_currency(costs.totals.get(period))
            ]);
        }

        table
    }

    fn service_table(costs: &TotalCosts) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Service",
            b -> ReportingPeriod::LastMonth.label(),
            b -> ReportingPeriod::ThisMonth.label(),
            b -> ReportingPeriod::Last7Days.label(),
            b -> ReportingPeriod::Yesterday.label()
        ]);

        let breakdown = &costs.totals_by_service;
        for service in Self::ranked_services(costs) {
            table.add_row(row![
                service.as_str(),
                r -> format_currency(breakdown.cost(ReportingPeriod::LastMonth, service)),
                r -> format_currency(breakdown.cost(ReportingPeriod::ThisMonth, service)),
                r -> format_currency(breakdown.cost(ReportingPeriod::Last7Days, service)),
                r -> format_currency(breakdown.cost(ReportingPeriod::Yesterday, service))
            ]);
        }

        table.add_row(row![
            b -> "TOTAL",
            br -> format_currency(costs.totals.last_month),
            br -> format_currency(costs.totals.this_month),
            br -> format_currency(costs.totals.last_7_days),
            br -> format_currency(costs.totals.yesterday)
        ]);

        table
    }
}

impl OutputFormatter for FancyFormatter {
    fn format_costs(&self, account: &str, costs: &TotalCosts, summary_only: bool) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(&self.heading(&format!("AWS Cost Report: {account}")));
        output.push_str("\n\n");
        output.push_str(&self.section("Summary"));
        output.push('\n');
        output.push_str(&Self::summary_table(costs).to_string());

        if !summary_only {
            output.push('\n');
            output.push_str(&self.section("Breakdown by Service"));
            output.push('\n');
            if Self::ranked_services(costs).is_empty() {
                output.push_str("No service costs recorded\n");
            } else {
                output.push_str(&Self::service_table(costs).to_string());
            }
        }

        output
    }
}

/// Get the appropriate formatter
///
/// # Arguments
///
/// * `kind` - Which rendering to produce
/// * `no_color` - Disable colors in the fancy formatter
///
/// # Examples
///
/// ```
/// use awscost_core::types::TotalCosts;
/// use awscost_terminal::output::{OutputKind, get_formatter};
///
/// let formatter = get_formatter(OutputKind::Json, false);
/// let output = formatter.format_costs("acme", &TotalCosts::default(), true);
/// assert!(output.contains("\"account\": \"acme\""));
/// ```
pub fn get_formatter(kind: OutputKind, no_color: bool) -> Box<dyn OutputFormatter> {
    match kind {
        OutputKind::Fancy => Box::new(FancyFormatter::new(no_color)),
        OutputKind::Json => Box::new(JsonFormatter),
        OutputKind::Text => Box::new(TextFormatter),
    }
}
