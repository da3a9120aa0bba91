//! CLI interface for aws-cost
//!
//! This module defines the command-line interface using clap. There are no
//! subcommands: one invocation fetches the costs, prints a report, and
//! optionally posts it to Slack.
//!
//! # Example
//!
//! ```bash
//! # Report for the default profile as colored tables
//! aws-cost
//!
//! # Totals only, as JSON, for a named profile
//! aws-cost --profile billing --json --summary
//!
//! # Assume a role and post last week's breakdown to Slack
//! aws-cost --role-arn arn:aws:iam::123456789012:role/cost-reader \
//!     --slack-token xoxb-... --slack-channel C01234567 --slack-period last7Days
//! ```

use awscost_aws::config::{AwsOptions, DEFAULT_PROFILE, DEFAULT_REGION};
use awscost_core::error::Result;
use awscost_core::types::ReportingPeriod;
use awscost_terminal::output::OutputKind;
use clap::{Args, Parser};

/// Cost report for an AWS account: yesterday, last 7 days, this month, and last month
#[derive(Parser, Debug, Clone)]
#[command(name = "aws-cost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub aws: AwsArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub slack: SlackArgs,

    /// Timezone that decides which day is "today" (e.g. "America/New_York", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z')]
    pub timezone: Option<String>,

    /// Use UTC to decide which day is "today" (overrides --timezone)
    #[arg(long)]
    pub utc: bool,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Where credentials and costs come from
#[derive(Args, Debug, Clone)]
pub struct AwsArgs {
    /// AWS profile from the shared config files
    #[arg(long, short = 'p', env = "AWS_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// AWS access key (requires --secret-key)
    #[arg(long, short = 'k')]
    pub access_key: Option<String>,

    /// AWS secret key (requires --access-key)
    #[arg(long, short = 's')]
    pub secret_key: Option<String>,

    /// AWS session token for temporary credentials
    #[arg(long, short = 'T')]
    pub session_token: Option<String>,

    /// AWS region
    #[arg(long, short = 'r', default_value = DEFAULT_REGION)]
    pub region: String,

    /// ARN of a role to assume on top of the profile credentials
    #[arg(long)]
    pub role_arn: Option<String>,

    /// Report on a linked account of the organization instead of the caller's account
    #[arg(long)]
    pub target_account: Option<String>,
}

/// How the report is printed
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(long, short = 'j', conflicts_with = "text")]
    pub json: bool,

    /// Output as plain text
    #[arg(long, short = 't')]
    pub text: bool,

    /// Only show the totals, without the per-service breakdown
    #[arg(long, short = 'u')]
    pub summary: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Optional Slack delivery
#[derive(Args, Debug, Clone)]
pub struct SlackArgs {
    /// Slack bot token used to post the report
    #[arg(long, short = 'S', env = "SLACK_TOKEN", hide_env_values = true)]
    pub slack_token: Option<String>,

    /// Slack channel to post the report to
    #[arg(long, short = 'C', env = "SLACK_CHANNEL")]
    pub slack_channel: Option<String>,

    /// Period of the per-service breakdown posted to Slack
    /// (yesterday, last7Days, thisMonth, lastMonth)
    #[arg(long, default_value = "yesterday")]
    pub slack_period: String,
}

impl AwsArgs {
    /// Credential options for session resolution
    pub fn to_options(&self) -> AwsOptions {
        AwsOptions {
            profile: self.profile.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            session_token: self.session_token.clone(),
            region: self.region.clone(),
            role_arn: self.role_arn.clone(),
            target_account: self.target_account.clone(),
        }
    }
}

impl OutputArgs {
    /// Selected output format; fancy unless JSON or text was requested
    pub fn kind(&self) -> OutputKind {
        if self.json {
            OutputKind::Json
        } else if self.text {
            OutputKind::Text
        } else {
            OutputKind::Fancy
        }
    }
}

impl SlackArgs {
    /// Token and channel, when both are given and non-empty
    pub fn target(&self) -> Option<(&str, &str)> {
        let token = self.slack_token.as_deref().filter(|t| !t.trim().is_empty())?;
        let channel = self
            .slack_channel
            .as_deref()
            .filter(|c| !c.trim().is_empty())?;
        Some((token, channel))
    }

    /// Parse the breakdown period
    pub fn period(&self) -> Result<ReportingPeriod> {
        self.slack_period.parse()
    }
}
