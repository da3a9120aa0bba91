//! Credential and session resolution
//!
//! Credentials come from one of two places:
//! - static keys passed on the command line (both access and secret key required)
//! - a named profile in the shared AWS config files, optionally assuming a role on top
//!
//! Whatever the source, the credentials are probed once so that a missing
//! or broken setup fails up front with instructions instead of deep inside
//! the first API call.

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_costexplorer::error::DisplayErrorContext;
use awscost_core::error::{AwsCostError, Result};
use tracing::{debug, info};

/// Profile used when none is given
pub const DEFAULT_PROFILE: &str = "default";

/// Cost Explorer is served from us-east-1
pub const DEFAULT_REGION: &str = "us-east-1";

/// Session name used when assuming a role
pub const ROLE_SESSION_NAME: &str = "aws-cost-cli";

const STATIC_PROVIDER_NAME: &str = "aws-cost-cli";

/// Options that drive credential resolution, usually straight from the CLI
#[derive(Debug, Clone)]
pub struct AwsOptions {
    pub profile: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub region: String,
    pub role_arn: Option<String>,
    pub target_account: Option<String>,
}

impl Default for AwsOptions {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            access_key: None,
            secret_key: None,
            session_token: None,
            region: DEFAULT_REGION.to_string(),
            role_arn: None,
            target_account: None,
        }
    }
}

/// Where credentials will be taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Keys given explicitly
    Static {
        access_key: String,
        secret_key: String,
        session_token: Option<String>,
    },
    /// A profile from the shared config files, optionally assuming a role
    Profile {
        name: String,
        role_arn: Option<String>,
    },
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AwsOptions {
    /// Decide where credentials come from
    ///
    /// Giving only one of the access key and secret key is an error.
    pub fn credential_source(&self) -> Result<CredentialSource> {
        match (non_empty(&self.access_key), non_empty(&self.secret_key)) {
            (Some(access_key), Some(secret_key)) => Ok(CredentialSource::Static {
                access_key: access_key.to_string(),
                secret_key: secret_key.to_string(),
                session_token: non_empty(&self.session_token).map(str::to_string),
            }),
            (None, None) => Ok(CredentialSource::Profile {
                name: self.profile_name().to_string(),
                role_arn: non_empty(&self.role_arn).map(str::to_string),
            }),
            _ => Err(AwsCostError::Credentials(
                "You need to provide both of the following options:\n  --access-key\n  --secret-key"
                    .to_string(),
            )),
        }
    }

    /// Profile to load, `default` when blank
    pub fn profile_name(&self) -> &str {
        match self.profile.trim() {
            "" => DEFAULT_PROFILE,
            name => name,
        }
    }

    /// Linked account to report on instead of the caller's own account
    pub fn target_account(&self) -> Option<&str> {
        non_empty(&self.target_account)
    }
}

/// Authenticated handle passed to the AWS clients
#[derive(Debug, Clone)]
pub struct AwsSession {
    config: SdkConfig,
    target_account: Option<String>,
}

impl AwsSession {
    /// Wrap an already loaded SDK config
    pub fn new(config: SdkConfig, target_account: Option<String>) -> Self {
        Self {
            config,
            target_account,
        }
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn target_account(&self) -> Option<&str> {
        self.target_account.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.config.region().map(|r| r.as_ref())
    }
}

/// Resolve credentials and build a session
pub async fn resolve_session(options: &AwsOptions) -> Result<AwsSession> {
    let region = Region::new(options.region.clone());
    let source = options.credential_source()?;

    let config = match &source {
        CredentialSource::Static {
            access_key,
            secret_key,
            session_token,
        } => {
            info!("Using credentials from command line options");
            let credentials = Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                session_token.clone(),
                None,
                STATIC_PROVIDER_NAME,
            );
            aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(credentials)
                .load()
                .await
        }
        CredentialSource::Profile { name, role_arn } => {
            info!("Using credentials from profile '{}'", name);
            let base = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .profile_name(name)
                .load()
                .await;

            match role_arn {
                Some(role_arn) => {
                    info!("Assuming role {}", role_arn);
                    let provider = AssumeRoleProvider::builder(role_arn.clone())
                        .session_name(ROLE_SESSION_NAME)
                        .configure(&base)
                        .build()
                        .await;
                    base.into_builder()
                        .credentials_provider(SharedCredentialsProvider::new(provider))
                        .build()
                }
                None => base,
            }
        }
    };

    ensure_credentials(&config, options.profile_name()).await?;

    Ok(AwsSession::new(
        config,
        options.target_account().map(str::to_string),
    ))
}

async fn ensure_credentials(config: &SdkConfig, profile: &str) -> Result<()> {
    let Some(provider) = config.credentials_provider() else {
        return Err(missing_credentials_error(profile));
    };

    match provider.provide_credentials().await {
        Ok(_) => Ok(()),
        Err(e) => {
            debug!("Credential probe failed: {}", DisplayErrorContext(&e));
            Err(missing_credentials_error(profile))
        }
    }
}

/// Error with instructions for every way of supplying credentials
pub fn missing_credentials_error(profile: &str) -> AwsCostError {
    let credentials_file = std::env::var("AWS_SHARED_CREDENTIALS_FILE")
        .unwrap_or_else(|_| "~/.aws/credentials".to_string());
    let config_file =
        std::env::var("AWS_CONFIG_FILE").unwrap_or_else(|_| "~/.aws/config".to_string());

    AwsCostError::Credentials(format!(
        "Could not find the AWS credentials in the following files for the profile \"{profile}\":
  {credentials_file}
  {config_file}

If the config files exist at different locations, set the following environment variables:
  AWS_SHARED_CREDENTIALS_FILE
  AWS_CONFIG_FILE

You can also configure the credentials via the following command:
  aws configure --profile {profile}

You can also provide the credentials via the following options:
  --access-key
  --secret-key
  --region
  --role-arn
  --target-account"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_keys_require_both() {
        let options = AwsOptions {
            access_key: Some("AKIDEXAMPLE".to_string()),
            ..Default::default()
        };
        let err = options.credential_source().unwrap_err();
        assert!(matches!(err, AwsCostError::Credentials(_)));
        assert!(err.to_string().contains("--secret-key"));

        let options = AwsOptions {
            secret_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(options.credential_source().is_err());
    }

    #[test]
    fn test_static_keys() {
        let options = AwsOptions {
            access_key: Some("AKIDEXAMPLE".to_string()),
            secret_key: Some("secret".to_string()),
            session_token: Some("".to_string()),
            role_arn: Some("arn:aws:iam::123456789012:role/ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(
            options.credential_source().unwrap(),
            CredentialSource::Static {
                access_key: "AKIDEXAMPLE".to_string(),
                secret_key: "secret".to_string(),
                session_token: None,
            }
        );
    }

    #[test]
    fn test_empty_keys_fall_back_to_profile() {
        let options = AwsOptions {
            profile: "billing".to_string(),
            access_key: Some("".to_string()),
            secret_key: Some("  ".to_string()),
            role_arn: Some("arn:aws:iam::123456789012:role/test-role".to_string()),
            ..Default::default()
        };
        assert_eq!(
            options.credential_source().unwrap(),
            CredentialSource::Profile {
                name: "billing".to_string(),
                role_arn: Some("arn:aws:iam::123456789012:role/test-role".to_string()),
            }
        );
    }

    #[test]
    fn test_blank_profile_uses_default() {
        let options = AwsOptions {
            profile: String::new(),
            ..Default::default()
        };
        assert_eq!(
            options.credential_source().unwrap(),
            CredentialSource::Profile {
                name: DEFAULT_PROFILE.to_string(),
                role_arn: None,
            }
        );
    }

    #[test]
    fn test_profile_name_is_trimmed() {
        let mut options = AwsOptions {
            profile: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(options.profile_name(), DEFAULT_PROFILE);
        options.profile = " billing ".to_string();
        assert_eq!(options.profile_name(), "billing");
    }

    #[tokio::test]
    async fn test_missing_provider_names_resolved_profile() {
        let options = AwsOptions {
            profile: String::new(),
            ..Default::default()
        };
        let config = SdkConfig::builder().build();

        let err = ensure_credentials(&config, options.profile_name())
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("profile \"default\""));
        assert!(message.contains("aws configure --profile default"));
        assert!(!message.contains("profile \"\""));
    }

    #[test]
    fn test_target_account_ignores_blank() {
        let mut options = AwsOptions::default();
        assert_eq!(options.target_account(), None);
        options.target_account = Some(" ".to_string());
        assert_eq!(options.target_account(), None);
        options.target_account = Some("123456789012".to_string());
        assert_eq!(options.target_account(), Some("123456789012"));
    }

    #[test]
    fn test_missing_credentials_message_lists_options() {
        let message = missing_credentials_error("staging").to_string();
        assert!(message.contains("profile \"staging\""));
        assert!(message.contains("aws configure --profile staging"));
        assert!(message.contains("--role-arn"));
    }

    #[tokio::test]
    async fn test_resolve_session_with_static_keys() {
        let options = AwsOptions {
            access_key: Some("AKIDEXAMPLE".to_string()),
            secret_key: Some("secret".to_string()),
            region: "eu-west-1".to_string(),
            target_account: Some("123456789012".to_string()),
            ..Default::default()
        };

        let session = resolve_session(&options).await.unwrap();
        assert_eq!(session.region(), Some("eu-west-1"));
        assert_eq!(session.target_account(), Some("123456789012"));
    }
}
