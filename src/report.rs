//! Top-level report flow
//!
//! Resolves the session, fetches the account name and the costs
//! concurrently, aggregates, prints, and optionally posts to Slack.

use std::future::Future;

use awscost_aws::{CostExplorerSource, account_alias, resolve_session};
use awscost_core::aggregation::Aggregator;
use awscost_core::error::Result;
use awscost_core::source::{CostSource, get_total_costs};
use awscost_core::timezone::TimezoneConfig;
use awscost_core::types::{ReportingPeriod, TotalCosts};
use awscost_slack::SlackNotifier;
use awscost_terminal::output::{OutputKind, get_formatter};
use tracing::info;

use crate::cli::Cli;
use crate::progress::Spinner;

/// Aggregated costs together with the account they belong to
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    pub account: String,
    pub costs: TotalCosts,
}

/// Run the account lookup and the cost fetch side by side
///
/// Fails with the first error from either side.
pub async fn collect<S, A>(source: &S, account: A, aggregator: &Aggregator) -> Result<CostReport>
where
    S: CostSource + ?Sized,
    A: Future<Output = Result<String>>,
{
    let (account, costs) = tokio::try_join!(account, get_total_costs(source, aggregator))?;
    Ok(CostReport { account, costs })
}

/// Render a report in the requested format
pub fn render(report: &CostReport, kind: OutputKind, summary_only: bool, no_color: bool) -> String {
    get_formatter(kind, no_color).format_costs(&report.account, &report.costs, summary_only)
}

/// Post a report to Slack
pub async fn notify(
    notifier: &SlackNotifier,
    report: &CostReport,
    summary_only: bool,
    period: ReportingPeriod,
) -> Result<()> {
    notifier
        .notify_costs(&report.account, &report.costs, summary_only, period)
        .await
}

/// Execute one invocation of the CLI
pub async fn run(cli: &Cli) -> Result<()> {
    // Reject a bad period before any AWS call is made
    let slack_period = cli.slack.period()?;

    let tz_config = TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.utc)?;
    info!("Using timezone: {}", tz_config.display_name());
    let aggregator = Aggregator::from_timezone(&tz_config);
    info!("Reporting costs as of {}", aggregator.today());

    let kind = cli.output.kind();
    let spinner = Spinner::start(kind == OutputKind::Fancy, "Resolving AWS credentials");

    let result = async {
        let session = resolve_session(&cli.aws.to_options()).await?;
        spinner.set_message("Fetching costs from Cost Explorer");
        let source = CostExplorerSource::new(&session);
        collect(&source, account_alias(&session), &aggregator).await
    }
    .await;
    spinner.finish();
    let report = result?;

    println!(
        "{}",
        render(&report, kind, cli.output.summary, cli.output.no_color)
    );

    if let Some((token, channel)) = cli.slack.target() {
        info!("Posting {} breakdown to Slack channel {}", slack_period, channel);
        let notifier = SlackNotifier::new(token, channel);
        notify(&notifier, &report, cli.output.summary, slack_period).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use awscost_core::error::AwsCostError;
    use awscost_core::types::{FetchWindow, RawCostByService};
    use chrono::NaiveDate;

    struct FixedSource(RawCostByService);

    #[async_trait]
    impl CostSource for FixedSource {
        async fn fetch_costs(&self, _window: &FetchWindow) -> Result<RawCostByService> {
            Ok(self.0.clone())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 11).unwrap()
    }

    #[tokio::test]
    async fn test_collect_combines_account_and_costs() {
        let mut raw = RawCostByService::new();
        raw.insert("Amazon EC2", NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), 4.5);
        let source = FixedSource(raw);
        let aggregator = Aggregator::new(today());

        let report = collect(&source, async { Ok("acme".to_string()) }, &aggregator)
            .await
            .unwrap();

        assert_eq!(report.account, "acme");
        assert_eq!(report.costs.totals.yesterday, 4.5);
        assert_eq!(report.costs.totals.this_month, 4.5);
    }

    #[tokio::test]
    async fn test_collect_fails_when_account_lookup_fails() {
        let source = FixedSource(RawCostByService::new());
        let aggregator = Aggregator::new(today());

        let result = collect(
            &source,
            async { Err(AwsCostError::Api("AccessDenied".to_string())) },
            &aggregator,
        )
        .await;

        assert!(matches!(result, Err(AwsCostError::Api(_))));
    }

    #[test]
    fn test_render_respects_kind() {
        let report = CostReport {
            account: "acme".to_string(),
            costs: TotalCosts::default(),
        };
        assert!(render(&report, OutputKind::Text, true, true).contains("Account: acme"));
        assert!(render(&report, OutputKind::Json, true, true).contains("\"account\": \"acme\""));
    }
}
