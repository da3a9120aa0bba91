//! Core domain types for aws-cost
//!
//! This module contains the fundamental types shared by the fetcher, the
//! aggregator and the presentation crates: service identifiers, the raw
//! per-service daily cost map, reporting periods, and the aggregated totals.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use crate::error::AwsCostError;

/// Number of days covered by a single cost fetch, ending (exclusive) today
pub const FETCH_WINDOW_DAYS: u64 = 65;

/// Strongly-typed AWS service name wrapper
///
/// Service names are provider-defined identifiers such as
/// `"Amazon Elastic Compute Cloud - Compute"`.
///
/// # Examples
/// ```
/// use awscost_core::types::ServiceName;
///
/// let service = ServiceName::new("Amazon Simple Storage Service");
/// assert_eq!(service.as_str(), "Amazon Simple Storage Service");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceName(String);

impl ServiceName {
    /// Create a new ServiceName from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Daily costs for a single service, keyed by the start date of the billing day
pub type DailyCosts = BTreeMap<NaiveDate, f64>;

/// Raw per-service daily costs as returned by the billing API
///
/// Both levels are ordered maps so iteration (and therefore floating point
/// summation order) is the same on every run.
///
/// # Examples
/// ```
/// use awscost_core::types::RawCostByService;
/// use chrono::NaiveDate;
///
/// let mut raw = RawCostByService::new();
/// let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
/// raw.insert("AWS Lambda", day, 1.25);
/// raw.insert("AWS Lambda", day, 0.75);
///
/// assert_eq!(raw.len(), 1);
/// assert_eq!(raw.record_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCostByService(BTreeMap<ServiceName, DailyCosts>);

impl RawCostByService {
    /// Create an empty cost map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cost for a service on a day, adding to any cost already recorded
    pub fn insert(&mut self, service: impl Into<ServiceName>, date: NaiveDate, cost: f64) {
        *self
            .0
            .entry(service.into())
            .or_default()
            .entry(date)
            .or_insert(0.0) += cost;
    }

    /// Daily costs of a single service
    pub fn get(&self, service: &ServiceName) -> Option<&DailyCosts> {
        self.0.get(service)
    }

    /// All service names, in order
    pub fn services(&self) -> impl Iterator<Item = &ServiceName> {
        self.0.keys()
    }

    /// Iterate over services and their daily costs
    pub fn iter(&self) -> btree_map::Iter<'_, ServiceName, DailyCosts> {
        self.0.iter()
    }

    /// Whether no service has any cost recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of services
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of (service, date) cost records
    pub fn record_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}

impl<'a> IntoIterator for &'a RawCostByService {
    type Item = (&'a ServiceName, &'a DailyCosts);
    type IntoIter = btree_map::Iter<'a, ServiceName, DailyCosts>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(ServiceName, NaiveDate, f64)> for RawCostByService {
    fn from_iter<I: IntoIterator<Item = (ServiceName, NaiveDate, f64)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (service, date, cost) in iter {
            raw.insert(service, date, cost);
        }
        raw
    }
}

/// One of the four fixed reporting periods
///
/// The periods are independent windows over the same data, not a partition:
/// yesterday is always part of the last 7 days, which usually overlaps this month.
///
/// # Examples
/// ```
/// use awscost_core::types::ReportingPeriod;
///
/// let period: ReportingPeriod = "last7Days".parse().unwrap();
/// assert_eq!(period, ReportingPeriod::Last7Days);
/// assert_eq!(period.label(), "Last 7 Days");
/// assert!("tomorrow".parse::<ReportingPeriod>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportingPeriod {
    /// Every day of the previous calendar month
    #[serde(rename = "lastMonth")]
    LastMonth,
    /// From the 1st of the current month up to yesterday
    #[serde(rename = "thisMonth")]
    ThisMonth,
    /// The 7 days ending with yesterday
    #[serde(rename = "last7Days")]
    Last7Days,
    /// The day before today
    #[serde(rename = "yesterday")]
    Yesterday,
}

impl ReportingPeriod {
    /// All periods in display order
    pub const ALL: [ReportingPeriod; 4] = [
        ReportingPeriod::LastMonth,
        ReportingPeriod::ThisMonth,
        ReportingPeriod::Last7Days,
        ReportingPeriod::Yesterday,
    ];

    /// Machine-readable key, as used in JSON output
    pub fn key(self) -> &'static str {
        match self {
            Self::LastMonth => "lastMonth",
            Self::ThisMonth => "thisMonth",
            Self::Last7Days => "last7Days",
            Self::Yesterday => "yesterday",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::LastMonth => "Last Month",
            Self::ThisMonth => "This Month",
            Self::Last7Days => "Last 7 Days",
            Self::Yesterday => "Yesterday",
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ReportingPeriod {
    type Err = AwsCostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lastMonth" | "last-month" | "last_month" => Ok(Self::LastMonth),
            "thisMonth" | "this-month" | "this_month" => Ok(Self::ThisMonth),
            "last7Days" | "last-7-days" | "last_7_days" => Ok(Self::Last7Days),
            "yesterday" => Ok(Self::Yesterday),
            _ => Err(AwsCostError::InvalidPeriod(s.to_string())),
        }
    }
}

/// One number per reporting period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub last_month: f64,
    pub this_month: f64,
    #[serde(rename = "last7Days")]
    pub last_7_days: f64,
    pub yesterday: f64,
}

impl PeriodTotals {
    /// Value for a period
    pub fn get(&self, period: ReportingPeriod) -> f64 {
        match period {
            ReportingPeriod::LastMonth => self.last_month,
            ReportingPeriod::ThisMonth => self.this_month,
            ReportingPeriod::Last7Days => self.last_7_days,
            ReportingPeriod::Yesterday => self.yesterday,
        }
    }

    /// Copy of these totals with `cost` added to one period
    pub fn with_added(mut self, period: ReportingPeriod, cost: f64) -> Self {
        match period {
            ReportingPeriod::LastMonth => self.last_month += cost,
            ReportingPeriod::ThisMonth => self.this_month += cost,
            ReportingPeriod::Last7Days => self.last_7_days += cost,
            ReportingPeriod::Yesterday => self.yesterday += cost,
        }
        self
    }
}

/// Per-period, per-service totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBreakdown {
    pub last_month: BTreeMap<ServiceName, f64>,
    pub this_month: BTreeMap<ServiceName, f64>,
    #[serde(rename = "last7Days")]
    pub last_7_days: BTreeMap<ServiceName, f64>,
    pub yesterday: BTreeMap<ServiceName, f64>,
}

impl ServiceBreakdown {
    /// Service totals for a period
    pub fn get(&self, period: ReportingPeriod) -> &BTreeMap<ServiceName, f64> {
        match period {
            ReportingPeriod::LastMonth => &self.last_month,
            ReportingPeriod::ThisMonth => &self.this_month,
            ReportingPeriod::Last7Days => &self.last_7_days,
            ReportingPeriod::Yesterday => &self.yesterday,
        }
    }

    fn get_mut(&mut self, period: ReportingPeriod) -> &mut BTreeMap<ServiceName, f64> {
        match period {
            ReportingPeriod::LastMonth => &mut self.last_month,
            ReportingPeriod::ThisMonth => &mut self.this_month,
            ReportingPeriod::Last7Days => &mut self.last_7_days,
            ReportingPeriod::Yesterday => &mut self.yesterday,
        }
    }

    /// Cost of a service in a period, treating a missing entry as zero
    pub fn cost(&self, period: ReportingPeriod, service: &ServiceName) -> f64 {
        self.get(period).get(service).copied().unwrap_or(0.0)
    }

    /// Services with a positive cost in `period`, most expensive first
    pub fn sorted_by_cost(&self, period: ReportingPeriod) -> Vec<(&ServiceName, f64)> {
        let mut services: Vec<_> = self
            .get(period)
            .iter()
            .filter(|(_, cost)| **cost > 0.0)
            .map(|(service, cost)| (service, *cost))
            .collect();
        services.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        services
    }

    /// All service names present in any period
    pub fn services(&self) -> Vec<&ServiceName> {
        let mut services: Vec<&ServiceName> = ReportingPeriod::ALL
            .iter()
            .flat_map(|period| self.get(*period).keys())
            .collect();
        services.sort();
        services.dedup();
        services
    }
}

/// Aggregated costs for the four reporting periods
///
/// Produced once per run by the aggregator and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCosts {
    /// Grand totals across all services
    pub totals: PeriodTotals,
    /// Totals broken down by service
    pub totals_by_service: ServiceBreakdown,
}

impl TotalCosts {
    /// Result with one more service folded in
    ///
    /// The service's period totals are recorded in the breakdown (zeros
    /// included) and added onto the grand totals.
    pub fn with_service(mut self, service: ServiceName, service_totals: PeriodTotals) -> Self {
        for period in ReportingPeriod::ALL {
            let cost = service_totals.get(period);
            self.totals = self.totals.with_added(period, cost);
            self.totals_by_service
                .get_mut(period)
                .insert(service.clone(), cost);
        }
        self
    }
}

/// The trailing window of days requested from the billing API
///
/// `start` is inclusive, `end` (today) is exclusive because the current
/// day's cost is always incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Window of [`FETCH_WINDOW_DAYS`] days ending before `today`
    pub fn trailing(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(FETCH_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// Whether `date` falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Start date as YYYY-MM-DD
    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// End date as YYYY-MM-DD
    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}
