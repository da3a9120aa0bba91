//! Slack notifications for aws-cost
//!
//! Renders the cost report as a Slack mrkdwn message and posts it to a
//! channel through the `chat.postMessage` Web API method.

use awscost_core::error::{AwsCostError, Result};
use awscost_core::types::{ReportingPeriod, TotalCosts};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default Slack Web API host
pub const SLACK_API_BASE_URL: &str = "https://slack.com";

const POST_MESSAGE_PATH: &str = "/api/chat.postMessage";

/// Per-service lines for one period
///
/// Only services with a positive cost are listed, most expensive first,
/// as `` > <service>: `$<x.xx>` `` joined by newlines.
pub fn format_service_breakdown(costs: &TotalCosts, period: ReportingPeriod) -> String {
    costs
        .totals_by_service
        .sorted_by_cost(period)
        .into_iter()
        .map(|(service, cost)| format!("> {service}: `${cost:.2}`"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full mrkdwn message for an account
///
/// The breakdown section for `period` is appended unless `summary_only`.
pub fn build_message(
    account: &str,
    costs: &TotalCosts,
    summary_only: bool,
    period: ReportingPeriod,
) -> String {
    let totals = &costs.totals;
    let mut message = format!(
        "> *Account: {account}*\n\
         \n\
         > *Summary *\n\
         > Total Yesterday: `${:.2}`\n\
         > Total This Month: `${:.2}`\n\
         > Total Last Month: `${:.2}`\n",
        totals.yesterday, totals.this_month, totals.last_month
    );

    if !summary_only {
        message.push_str(&format!(
            "\n> *Breakdown by Service:*\n{}\n",
            format_service_breakdown(costs, period)
        ));
    }

    message
}

/// Posts messages to a Slack channel with a bot token
pub struct SlackNotifier {
    token: String,
    channel: String,
    base_url: String,
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Create a notifier that talks to the public Slack API
    pub fn new(token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::with_base_url(token, channel, SLACK_API_BASE_URL)
    }

    /// Create a notifier against a different API host
    pub fn with_base_url(
        token: impl Into<String>,
        channel: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            channel: channel.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Post an mrkdwn message to the channel
    pub async fn notify(&self, message: &str) -> Result<()> {
        let payload = SlackPayload {
            channel: &self.channel,
            blocks: vec![SlackBlock {
                kind: "section",
                text: SlackText {
                    kind: "mrkdwn",
                    text: message,
                },
            }],
        };

        debug!(channel = %self.channel, "Posting cost report to Slack");

        let response = self
            .client
            .post(format!("{}{}", self.base_url, POST_MESSAGE_PATH))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body: SlackResponse = response.json().await?;
        if body.ok {
            debug!(channel = %self.channel, "Slack notification sent");
            Ok(())
        } else {
            let error = body.error.unwrap_or_else(|| "unknown error".to_string());
            warn!(channel = %self.channel, error = %error, "Slack rejected the message");
            Err(AwsCostError::Notification(error))
        }
    }

    /// Build and post the cost report for an account
    pub async fn notify_costs(
        &self,
        account: &str,
        costs: &TotalCosts,
        summary_only: bool,
        period: ReportingPeriod,
    ) -> Result<()> {
        let message = build_message(account, costs, summary_only, period);
        self.notify(&message).await
    }
}

#[derive(Debug, Serialize)]
struct SlackPayload<'a> {
    channel: &'a str,
    blocks: Vec<SlackBlock<'a>>,
}

#[derive(Debug, Serialize)]
struct SlackBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: SlackText<'a>,
}

#[derive(Debug, Serialize)]
struct SlackText<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}
