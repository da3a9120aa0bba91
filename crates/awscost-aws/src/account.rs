//! Account display name lookup

use aws_config::Region;
use tracing::{debug, info};

use crate::api_error;
use crate::config::AwsSession;
use awscost_core::error::Result;

/// Organizations is a global service homed in us-east-1
const ORGANIZATIONS_REGION: &str = "us-east-1";

/// Look up a human readable name for the account being reported on
///
/// For a target account the Organizations account name is used, falling
/// back to the account id. Otherwise the first IAM account alias is used,
/// then the caller's account id, then an empty string.
pub async fn account_alias(session: &AwsSession) -> Result<String> {
    if let Some(account_id) = session.target_account() {
        let config = session
            .sdk_config()
            .to_builder()
            .region(Region::new(ORGANIZATIONS_REGION))
            .build();
        let client = aws_sdk_organizations::Client::new(&config);

        info!("Describing linked account {}", account_id);
        let output = client
            .describe_account()
            .account_id(account_id)
            .send()
            .await
            .map_err(api_error)?;

        let name = output.account().and_then(|account| account.name());
        return Ok(name.unwrap_or(account_id).to_string());
    }

    let iam = aws_sdk_iam::Client::new(session.sdk_config());
    let aliases = iam
        .list_account_aliases()
        .send()
        .await
        .map_err(api_error)?;

    if let Some(alias) = first_alias(aliases.account_aliases()) {
        debug!("Using IAM account alias '{}'", alias);
        return Ok(alias.to_string());
    }

    let sts = aws_sdk_sts::Client::new(session.sdk_config());
    let identity = sts
        .get_caller_identity()
        .send()
        .await
        .map_err(api_error)?;

    Ok(identity.account().unwrap_or_default().to_string())
}

fn first_alias(aliases: &[String]) -> Option<&str> {
    aliases
        .iter()
        .map(|alias| alias.trim())
        .find(|alias| !alias.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session_for;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TARGET: &str = "210987654321";

    #[test]
    fn test_first_alias() {
        assert_eq!(first_alias(&[]), None);
        assert_eq!(first_alias(&["".to_string()]), None);
        assert_eq!(
            first_alias(&["prod-billing".to_string(), "other".to_string()]),
            Some("prod-billing")
        );
    }

    fn xml(body: String) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body, "text/xml")
    }

    fn account_aliases(aliases: &[&str]) -> ResponseTemplate {
        let members: String = aliases
            .iter()
            .map(|alias| format!("<member>{alias}</member>"))
            .collect();
        xml(format!(
            r#"<ListAccountAliasesResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <ListAccountAliasesResult>
    <IsTruncated>false</IsTruncated>
    <AccountAliases>{members}</AccountAliases>
  </ListAccountAliasesResult>
  <ResponseMetadata><RequestId>req-iam</RequestId></ResponseMetadata>
</ListAccountAliasesResponse>"#
        ))
    }

    fn caller_identity(account: Option<&str>) -> ResponseTemplate {
        let account = account
            .map(|id| format!("<Account>{id}</Account>"))
            .unwrap_or_default();
        xml(format!(
            r#"<GetCallerIdentityResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <GetCallerIdentityResult>
    <Arn>arn:aws:iam::123456789012:user/billing</Arn>
    <UserId>AIDAEXAMPLE</UserId>
    {account}
  </GetCallerIdentityResult>
  <ResponseMetadata><RequestId>req-sts</RequestId></ResponseMetadata>
</GetCallerIdentityResponse>"#
        ))
    }

    async fn mount(server: &MockServer, action: &str, response: ResponseTemplate, calls: u64) {
        Mock::given(method("POST"))
            .and(body_string_contains(action))
            .respond_with(response)
            .expect(calls)
            .mount(server)
            .await;
    }

    async fn mount_describe_account(server: &MockServer, account: serde_json::Value) {
        mount(
            server,
            TARGET,
            ResponseTemplate::new(200).set_body_raw(
                json!({ "Account": account }).to_string(),
                "application/x-amz-json-1.1",
            ),
            1,
        )
        .await;
    }

    #[tokio::test]
    async fn test_target_account_uses_organizations_name() {
        let server = MockServer::start().await;
        mount_describe_account(&server, json!({ "Id": TARGET, "Name": "Production" })).await;
        mount(&server, "Action=ListAccountAliases", account_aliases(&["ignored"]), 0).await;

        let session = session_for(&server.uri(), Some(TARGET)).await;
        assert_eq!(account_alias(&session).await.unwrap(), "Production");
    }

    #[tokio::test]
    async fn test_target_account_without_name_uses_id() {
        let server = MockServer::start().await;
        mount_describe_account(&server, json!({ "Id": TARGET })).await;

        let session = session_for(&server.uri(), Some(TARGET)).await;
        assert_eq!(account_alias(&session).await.unwrap(), TARGET);
    }

    #[tokio::test]
    async fn test_iam_alias_wins_over_caller_account() {
        let server = MockServer::start().await;
        mount(&server, "Action=ListAccountAliases", account_aliases(&["prod-billing"]), 1).await;
        mount(&server, "Action=GetCallerIdentity", caller_identity(Some("123456789012")), 0).await;

        let session = session_for(&server.uri(), None).await;
        assert_eq!(account_alias(&session).await.unwrap(), "prod-billing");
    }

    #[tokio::test]
    async fn test_no_alias_falls_back_to_caller_account() {
        let server = MockServer::start().await;
        mount(&server, "Action=ListAccountAliases", account_aliases(&[]), 1).await;
        mount(&server, "Action=GetCallerIdentity", caller_identity(Some("123456789012")), 1).await;

        let session = session_for(&server.uri(), None).await;
        assert_eq!(account_alias(&session).await.unwrap(), "123456789012");
    }

    #[tokio::test]
    async fn test_no_alias_and_no_account_is_empty() {
        let server = MockServer::start().await;
        mount(&server, "Action=ListAccountAliases", account_aliases(&[]), 1).await;
        mount(&server, "Action=GetCallerIdentity", caller_identity(None), 1).await;

        let session = session_for(&server.uri(), None).await;
        assert_eq!(account_alias(&session).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_alias_lookup_failure_is_api_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            "Action=ListAccountAliases",
            ResponseTemplate::new(403).set_body_raw(
                r#"<ErrorResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <Error><Type>Sender</Type><Code>AccessDenied</Code><Message>denied</Message></Error>
  <RequestId>req-iam</RequestId>
</ErrorResponse>"#,
                "text/xml",
            ),
            1,
        )
        .await;

        let session = session_for(&server.uri(), None).await;
        let err = account_alias(&session).await.unwrap_err();
        assert!(matches!(err, awscost_core::error::AwsCostError::Api(_)));
    }
}
