//! Common test utilities and helpers for aws-cost tests
//!
//! This module provides the mocked 65-day billing scenario and an
//! in-memory cost source so the report flow can be exercised without AWS.

use async_trait::async_trait;
use awscost::{CostSource, RawCostByService, Result, ServiceName};
use awscost_core::types::FetchWindow;
use chrono::{Datelike, NaiveDate};
use std::sync::Mutex;

/// "Today" of the mocked scenario
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 11).unwrap()
}

/// Daily cost of `service1` by month; `service2` costs 100x as much
pub fn service1_daily_cost(date: NaiveDate) -> f64 {
    match date.month() {
        3 => 0.9,
        4 => 1.0,
        5 => 1.1,
        _ => 0.0,
    }
}

/// The two-service scenario over the `days` days before `today`
pub fn generate_mocked_cost_by_service(today: NaiveDate, days: u64) -> RawCostByService {
    let start = today - chrono::Days::new(days);
    start
        .iter_days()
        .take_while(|date| *date < today)
        .flat_map(|date| {
            let cost = service1_daily_cost(date);
            [
                (ServiceName::from("service1"), date, cost),
                (ServiceName::from("service2"), date, cost * 100.0),
            ]
        })
        .collect()
}

/// Cost source returning a fixed mapping and recording requested windows
pub struct InMemorySource {
    costs: RawCostByService,
    requests: Mutex<Vec<FetchWindow>>,
}

impl InMemorySource {
    pub fn new(costs: RawCostByService) -> Self {
        Self {
            costs,
            requests: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<FetchWindow> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CostSource for InMemorySource {
    async fn fetch_costs(&self, window: &FetchWindow) -> Result<RawCostByService> {
        self.requests.lock().unwrap().push(*window);
        Ok(self
            .costs
            .iter()
            .flat_map(|(service, daily)| {
                daily
                    .iter()
                    .filter(|(date, _)| window.contains(**date))
                    .map(move |(date, cost)| (service.clone(), *date, *cost))
            })
            .collect())
    }
}

/// Approximate float comparison
#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
