//! Cost source trait
//!
//! The billing API sits behind `CostSource` so the aggregation pipeline can
//! run against the real Cost Explorer client or an in-memory fixture.

use crate::aggregation::Aggregator;
use crate::error::Result;
use crate::types::{FetchWindow, RawCostByService, TotalCosts};
use async_trait::async_trait;
use tracing::info;

/// Supplier of raw per-service daily costs
#[async_trait]
pub trait CostSource: Send + Sync {
    /// Fetch every daily cost record inside `window`
    async fn fetch_costs(&self, window: &FetchWindow) -> Result<RawCostByService>;
}

/// Fetch the trailing window ending at the aggregator's reference day and aggregate it
pub async fn get_total_costs<S>(source: &S, aggregator: &Aggregator) -> Result<TotalCosts>
where
    S: CostSource + ?Sized,
{
    let window = FetchWindow::trailing(aggregator.today());
    let raw = source.fetch_costs(&window).await?;
    info!(
        "Fetched {} cost records for {} services between {} and {}",
        raw.record_count(),
        raw.len(),
        window.start_str(),
        window.end_str()
    );
    Ok(aggregator.aggregate(&raw))
}
