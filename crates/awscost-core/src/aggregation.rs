//! Cost aggregation
//!
//! Turns the raw per-service daily costs into totals for the four
//! reporting periods, both overall and per service.
//!
//! Each period is an independent window over the same data. A single day
//! can count toward several periods at once: yesterday's cost is part of
//! `yesterday`, `last7Days`, and (unless today is the 1st) `thisMonth`.
//!
//! The aggregator is anchored to an explicit reference date ("today")
//! rather than reading the clock, so results are reproducible.
//!
//! # Examples
//!
//! ```
//! use awscost_core::aggregation::Aggregator;
//! use awscost_core::types::RawCostByService;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
//! let mut raw = RawCostByService::new();
//! raw.insert("Amazon S3", NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), 2.5);
//! raw.insert("Amazon S3", NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(), 4.0);
//!
//! let costs = Aggregator::new(today).aggregate(&raw);
//! assert_eq!(costs.totals.yesterday, 2.5);
//! assert_eq!(costs.totals.this_month, 2.5);
//! assert_eq!(costs.totals.last_month, 4.0);
//! ```

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::timezone::TimezoneConfig;
use crate::types::{DailyCosts, PeriodTotals, RawCostByService, ReportingPeriod, TotalCosts};

/// Boundaries of the four reporting periods for a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    today: NaiveDate,
    yesterday: NaiveDate,
    last_7_days_start: NaiveDate,
    this_month: (i32, u32),
    last_month: (i32, u32),
}

impl PeriodBounds {
    /// Compute the period boundaries relative to `today`
    pub fn anchored_at(today: NaiveDate) -> Self {
        let this_month = (today.year(), today.month());
        let last_month = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };

        Self {
            today,
            yesterday: today.pred_opt().unwrap_or(NaiveDate::MIN),
            last_7_days_start: today
                .checked_sub_days(Days::new(7))
                .unwrap_or(NaiveDate::MIN),
            this_month,
            last_month,
        }
    }

    /// The reference day
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Whether a cost dated `date` counts toward `period`
    ///
    /// `last7Days` compares against `[today - 7, today]` inclusive on both
    /// ends. A record for today itself never arrives from the billing API,
    /// but if one did it would be counted here and in `thisMonth` while
    /// staying out of `yesterday`.
    pub fn contains(&self, period: ReportingPeriod, date: NaiveDate) -> bool {
        match period {
            ReportingPeriod::LastMonth => (date.year(), date.month()) == self.last_month,
            ReportingPeriod::ThisMonth => (date.year(), date.month()) == self.this_month,
            ReportingPeriod::Last7Days => date >= self.last_7_days_start && date <= self.today,
            ReportingPeriod::Yesterday => date == self.yesterday,
        }
    }
}

/// Aggregates raw costs into reporting-period totals
#[derive(Debug, Clone)]
pub struct Aggregator {
    bounds: PeriodBounds,
}

impl Aggregator {
    /// Create an aggregator anchored at `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            bounds: PeriodBounds::anchored_at(today),
        }
    }

    /// Create an aggregator anchored at the current date in the configured timezone
    pub fn from_timezone(tz_config: &TimezoneConfig) -> Self {
        Self::new(tz_config.today())
    }

    /// The reference day the periods are computed from
    pub fn today(&self) -> NaiveDate {
        self.bounds.today()
    }

    /// Period boundaries in use
    pub fn bounds(&self) -> &PeriodBounds {
        &self.bounds
    }

    /// Compute the period totals for every service
    ///
    /// Costs are summed as given: no rounding, and negative amounts are not
    /// filtered. Dates outside the fetch window are classified like any other.
    pub fn aggregate(&self, raw: &RawCostByService) -> TotalCosts {
        debug!(
            today = %self.bounds.today,
            services = raw.len(),
            records = raw.record_count(),
            "Aggregating costs"
        );

        raw.iter()
            .map(|(service, daily)| (service.clone(), self.service_totals(daily)))
            .fold(TotalCosts::default(), |costs, (service, totals)| {
                costs.with_service(service, totals)
            })
    }

    /// Period totals for a single service
    pub fn service_totals(&self, daily: &DailyCosts) -> PeriodTotals {
        daily
            .iter()
            .fold(PeriodTotals::default(), |totals, (date, cost)| {
                ReportingPeriod::ALL
                    .into_iter()
                    .filter(|period| self.bounds.contains(*period, *date))
                    .fold(totals, |totals, period| totals.with_added(period, *cost))
            })
    }
}
