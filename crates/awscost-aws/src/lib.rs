//! AWS integration for aws-cost
//!
//! This crate resolves credentials into an [`AwsSession`], looks up a
//! display name for the account, and implements the Cost Explorer
//! [`CostSource`](awscost_core::CostSource) that feeds the aggregator.

pub mod account;
pub mod config;
pub mod cost_explorer;

pub use account::account_alias;
pub use config::{AwsOptions, AwsSession, CredentialSource, resolve_session};
pub use cost_explorer::CostExplorerSource;

use awscost_core::AwsCostError;
use aws_sdk_costexplorer::error::DisplayErrorContext;

/// Convert an SDK error into an `Api` error with its full cause chain
pub(crate) fn api_error<E>(err: E) -> AwsCostError
where
    E: std::error::Error + 'static,
{
    AwsCostError::Api(DisplayErrorContext(err).to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use aws_config::retry::RetryConfig;
    use aws_config::{BehaviorVersion, Region};
    use aws_credential_types::Credentials;

    use crate::config::AwsSession;

    /// Session with static keys whose clients all talk to `endpoint_url`
    pub async fn session_for(endpoint_url: &str, target_account: Option<&str>) -> AwsSession {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "test"))
            .endpoint_url(endpoint_url)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;
        AwsSession::new(config, target_account.map(str::to_string))
    }
}
