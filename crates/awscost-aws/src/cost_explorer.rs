//! Cost Explorer backed cost source
//!
//! Queries daily unblended cost grouped by service for the fetch window,
//! follows pagination, and reshapes the groups into a
//! [`RawCostByService`] for the aggregator.
//!
//! Credits, refunds, upfront fees and support charges are excluded from
//! the query so the figures reflect usage.

use async_trait::async_trait;
use aws_sdk_costexplorer::Client;
use aws_sdk_costexplorer::types::{
    DateInterval, Dimension, DimensionValues, Expression, Granularity, GroupDefinition,
    GroupDefinitionType, ResultByTime,
};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api_error;
use crate::config::AwsSession;
use awscost_core::error::{AwsCostError, Result};
use awscost_core::source::CostSource;
use awscost_core::types::{FetchWindow, RawCostByService};

/// Metric requested from Cost Explorer
pub const COST_METRIC: &str = "UnblendedCost";

/// Record types that are not usage and are filtered out
pub const EXCLUDED_RECORD_TYPES: [&str; 4] = ["Credit", "Refund", "Upfront", "Support"];

/// One group of one day in a Cost Explorer response
#[derive(Debug, Clone, PartialEq)]
pub struct DailyGroupCost {
    /// Start of the day, `YYYY-MM-DD`
    pub start: String,
    /// Group keys; the service name plus the account id when grouped by account
    pub keys: Vec<String>,
    /// Amount of [`COST_METRIC`] as returned by the API
    pub amount: Option<String>,
}

/// Cost source that queries AWS Cost Explorer
pub struct CostExplorerSource {
    client: Client,
    target_account: Option<String>,
}

impl CostExplorerSource {
    pub fn new(session: &AwsSession) -> Self {
        Self {
            client: Client::new(session.sdk_config()),
            target_account: session.target_account().map(str::to_string),
        }
    }

    fn filter(&self) -> Expression {
        let exclude_non_usage = Expression::builder()
            .not(
                Expression::builder()
                    .dimensions(
                        DimensionValues::builder()
                            .key(Dimension::RecordType)
                            .set_values(Some(
                                EXCLUDED_RECORD_TYPES.iter().map(|t| t.to_string()).collect(),
                            ))
                            .build(),
                    )
                    .build(),
            )
            .build();

        match &self.target_account {
            Some(account_id) => Expression::builder()
                .and(exclude_non_usage)
                .and(
                    Expression::builder()
                        .dimensions(
                            DimensionValues::builder()
                                .key(Dimension::LinkedAccount)
                                .values(account_id)
                                .build(),
                        )
                        .build(),
                )
                .build(),
            None => exclude_non_usage,
        }
    }

    fn group_by(&self) -> Vec<GroupDefinition> {
        let mut groups = vec![
            GroupDefinition::builder()
                .r#type(GroupDefinitionType::Dimension)
                .key("SERVICE")
                .build(),
        ];
        if self.target_account.is_some() {
            groups.push(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key("LINKED_ACCOUNT")
                    .build(),
            );
        }
        groups
    }
}

#[async_trait]
impl CostSource for CostExplorerSource {
    async fn fetch_costs(&self, window: &FetchWindow) -> Result<RawCostByService> {
        info!(
            "Fetching AWS costs from {} to {}",
            window.start_str(),
            window.end_str()
        );

        let interval = DateInterval::builder()
            .start(window.start_str())
            .end(window.end_str())
            .build()
            .map_err(|e| AwsCostError::Config(format!("Failed to build date interval: {e}")))?;

        let mut groups = Vec::new();
        let mut next_page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let response = self
                .client
                .get_cost_and_usage()
                .time_period(interval.clone())
                .granularity(Granularity::Daily)
                .filter(self.filter())
                .metrics(COST_METRIC)
                .set_group_by(Some(self.group_by()))
                .set_next_page_token(next_page_token.take())
                .send()
                .await
                .map_err(api_error)?;

            pages += 1;
            groups.extend(flatten_results(response.results_by_time()));

            match response.next_page_token() {
                Some(token) if !token.is_empty() => next_page_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!("Fetched {} cost groups in {} page(s)", groups.len(), pages);
        let costs = reshape(groups)?;
        info!(
            "Loaded {} cost records across {} services",
            costs.record_count(),
            costs.len()
        );
        Ok(costs)
    }
}

/// Flatten per-day results into one entry per group
pub fn flatten_results(results: &[ResultByTime]) -> Vec<DailyGroupCost> {
    let mut flattened = Vec::new();

    for result in results {
        let Some(period) = result.time_period() else {
            warn!("Skipping cost result without a time period");
            continue;
        };

        for group in result.groups() {
            let amount = group
                .metrics()
                .and_then(|metrics| metrics.get(COST_METRIC))
                .and_then(|metric| metric.amount())
                .map(str::to_string);

            flattened.push(DailyGroupCost {
                start: period.start().to_string(),
                keys: group.keys().to_vec(),
                amount,
            });
        }
    }

    flattened
}

/// Whether a group key is an AWS account id rather than a service name
pub fn is_account_id(key: &str) -> bool {
    key.len() == 12 && key.bytes().all(|b| b.is_ascii_digit())
}

/// Build the service → date → cost mapping from flattened groups
///
/// The service is the first key that is not an account id. Groups without
/// a service or without an amount are skipped; an unparseable date or
/// amount is an error.
pub fn reshape<I>(groups: I) -> Result<RawCostByService>
where
    I: IntoIterator<Item = DailyGroupCost>,
{
    let mut costs = RawCostByService::default();

    for group in groups {
        let Some(service) = group.keys.iter().find(|key| !is_account_id(key)) else {
            warn!(
                "Skipping cost group on {} without a service key: {:?}",
                group.start, group.keys
            );
            continue;
        };

        let date = NaiveDate::parse_from_str(&group.start, "%Y-%m-%d")
            .map_err(|_| AwsCostError::InvalidDate(group.start.clone()))?;

        let Some(raw_amount) = group.amount.as_deref() else {
            warn!("Skipping {} on {}: no {} metric", service, group.start, COST_METRIC);
            continue;
        };

        let amount = raw_amount.trim().parse::<f64>().map_err(|_| {
            AwsCostError::InvalidAmount(format!(
                "'{raw_amount}' for {service} on {}",
                group.start
            ))
        })?;

        costs.insert(service.as_str(), date, amount);
    }

    Ok(costs)
}
