//! End-to-end checks of the GitHub plugin against a mock GitHub API.
//!
//! Both the installation token exchange and the issue read are served by a
//! single Wiremock server standing in for `https://api.github.com`.

use std::collections::BTreeMap;
use std::time::Duration;

use jvs_plugin_github::github::{
    InstallationToken, IssueGateway, IssueReference, JustificationError, OctocrabIssueGateway,
};
use jvs_plugin_github::test_support::test_plugin_config;
use jvs_plugin_github::{
    DisplayMetadata, GitHubPlugin, Justification, JustificationValidator, PluginConfig,
    ValidationOutcome,
};
use rstest::rstest;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;

use support::{
    INSTALLATION_TOKEN, access_tokens_path, issue_body, issue_mock, issue_path,
    mount_token_exchange, refused_base_url, token_exchange_mock,
};

const OWNER: &str = "test-owner";
const REPOSITORY: &str = "test-repo";
const NUMBER: u64 = 1;

fn issue_url() -> String {
    format!("https://github.com/{OWNER}/{REPOSITORY}/issues/{NUMBER}")
}

fn plugin_for(server: &MockServer) -> GitHubPlugin {
    plugin_with(test_plugin_config(&server.uri()))
}

fn plugin_with(config: PluginConfig) -> GitHubPlugin {
    GitHubPlugin::from_config(&config).expect("test configuration should build a plugin")
}

fn github_justification(value: &str) -> Justification {
    Justification::new("github", value)
}

#[rstest]
#[tokio::test]
async fn open_issue_is_accepted_with_annotations() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(200).set_body_json(issue_body(NUMBER, "open")),
    )
    .expect(1)
    .mount(&server)
    .await;

    let outcome = plugin_for(&server)
        .validate(&github_justification(&issue_url()))
        .await
        .expect("validation should complete");

    let expected = ValidationOutcome::accepted(BTreeMap::from([
        ("issue_url".to_owned(), issue_url()),
        ("issue_owner".to_owned(), OWNER.to_owned()),
        ("issue_repo".to_owned(), REPOSITORY.to_owned()),
        ("issue_number".to_owned(), NUMBER.to_string()),
    ]));
    assert_eq!(outcome, expected, "unexpected outcome");
}

#[rstest]
#[tokio::test]
async fn token_exchange_requests_issue_read_for_one_repository() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(access_tokens_path()))
        .and(header("accept", "application/vnd.github+json"))
        .and(header_exists("authorization"))
        .and(body_json(json!({
            "repositories": [REPOSITORY],
            "permissions": { "issues": "read" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": INSTALLATION_TOKEN,
            "expires_at": "2030-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(issue_path(OWNER, REPOSITORY, NUMBER)))
        .and(header("accept", "application/vnd.github+json"))
        .and(header(
            "authorization",
            format!("Bearer {INSTALLATION_TOKEN}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_body(NUMBER, "open")))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = plugin_for(&server)
        .validate(&github_justification(&issue_url()))
        .await
        .expect("validation should complete");

    assert!(outcome.valid, "open issue should be accepted: {outcome:?}");
}

#[rstest]
#[tokio::test]
async fn app_assertion_is_a_bearer_jwt() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(200).set_body_json(issue_body(NUMBER, "open")),
    )
    .mount(&server)
    .await;

    plugin_for(&server)
        .validate(&github_justification(&issue_url()))
        .await
        .expect("validation should complete");

    let requests = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    let token_request = requests
        .iter()
        .find(|request| request.url.path() == access_tokens_path())
        .expect("token exchange should be requested");
    let authorization = token_request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .expect("token exchange should carry an authorization header");
    let jwt = authorization
        .strip_prefix("Bearer ")
        .expect("assertion should be sent as a bearer token");

    assert_eq!(jwt.split('.').count(), 3, "assertion should be a JWT");
}

#[rstest]
#[tokio::test]
async fn closed_issue_is_rejected() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(200).set_body_json(issue_body(NUMBER, "closed")),
    )
    .mount(&server)
    .await;

    let outcome = plugin_for(&server)
        .validate(&github_justification(&issue_url()))
        .await
        .expect("a closed issue is a verdict, not a fault");

    assert_eq!(
        outcome,
        ValidationOutcome::rejected(
            "issue is in state: closed, please make sure to use an open issue"
        ),
        "unexpected outcome"
    );
}

#[rstest]
#[tokio::test]
async fn missing_issue_is_rejected() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/issues/issues#get-an-issue"
        })),
    )
    .mount(&server)
    .await;

    let outcome = plugin_for(&server)
        .validate(&github_justification(&issue_url()))
        .await
        .expect("a missing issue is a verdict, not a fault");

    assert_eq!(
        outcome,
        ValidationOutcome::rejected("issue not found"),
        "unexpected outcome"
    );
}

#[rstest]
#[tokio::test]
async fn issue_zero_is_left_for_github_to_reject() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, 0),
        ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
    )
    .expect(1)
    .mount(&server)
    .await;

    let outcome = plugin_for(&server)
        .validate(&github_justification(&format!(
            "https://github.com/{OWNER}/{REPOSITORY}/issues/0"
        )))
        .await
        .expect("a missing issue is a verdict, not a fault");

    assert_eq!(
        outcome,
        ValidationOutcome::rejected("issue not found"),
        "unexpected outcome"
    );
}

#[rstest]
#[case::wrong_host("https://gitlab.com/test-owner/test-repo/issues/1")]
#[case::pull_request("https://github.com/test-owner/test-repo/pull/1")]
#[case::non_numeric("https://github.com/test-owner/test-repo/issues/abc")]
#[tokio::test]
async fn malformed_url_is_rejected_without_network(#[case] value: &str) {
    let server = MockServer::start().await;

    let outcome = plugin_for(&server)
        .validate(&github_justification(value))
        .await
        .expect("a malformed URL is a verdict, not a fault");

    assert!(!outcome.valid, "malformed URL should be rejected");
    assert!(
        outcome
            .errors
            .first()
            .is_some_and(|message| message.starts_with("invalid issue url: ")),
        "unexpected errors: {:?}",
        outcome.errors
    );
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "no request should reach GitHub");
}

#[rstest]
#[tokio::test]
async fn other_category_is_rejected_without_network() {
    let server = MockServer::start().await;

    let outcome = plugin_for(&server)
        .validate(&Justification::new("jira", issue_url()))
        .await
        .expect("category mismatch is a verdict");

    assert_eq!(
        outcome,
        ValidationOutcome::rejected(
            "failed to perform validation, expected category \"jira\" to be \"github\""
        ),
        "unexpected outcome"
    );
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "no request should reach GitHub");
}

#[rstest]
#[case::unauthorized(401)]
#[case::forbidden(403)]
#[case::installation_missing(404)]
#[case::server_error(500)]
#[tokio::test]
async fn token_exchange_failure_is_a_fault(#[case] status: u16) {
    let server = MockServer::start().await;
    token_exchange_mock(status).mount(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(200).set_body_json(issue_body(NUMBER, "open")),
    )
    .expect(0)
    .mount(&server)
    .await;

    let fault = plugin_for(&server)
        .validate(&github_justification(&issue_url()))
        .await
        .expect_err("identity provider failure must be a fault");

    assert!(
        matches!(fault.cause(), JustificationError::AccessToken { .. }),
        "unexpected cause: {:?}",
        fault.cause()
    );
    let message = fault.to_string();
    assert!(
        message.starts_with("failed to get access token: "),
        "unexpected message: {message}"
    );
    assert!(
        message.contains(&status.to_string()),
        "status should be reported: {message}"
    );
}

#[rstest]
#[case::unauthorized(401)]
#[case::forbidden(403)]
#[case::server_error(500)]
#[case::unavailable(503)]
#[tokio::test]
async fn issue_read_failure_is_a_fault(#[case] status: u16) {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(status).set_body_json(json!({ "message": "Server Error" })),
    )
    .mount(&server)
    .await;

    let fault = plugin_for(&server)
        .validate(&github_justification(&issue_url()))
        .await
        .expect_err("an unusable GitHub answer must be a fault");

    assert!(
        matches!(fault.cause(), JustificationError::IssueLookup { .. }),
        "unexpected cause: {:?}",
        fault.cause()
    );
    assert!(
        fault.to_string().starts_with("failed to get issue info: "),
        "unexpected message: {fault}"
    );
}

#[rstest]
#[tokio::test]
async fn unreachable_identity_provider_is_a_fault() {
    let plugin = plugin_with(test_plugin_config(&refused_base_url()));

    let fault = plugin
        .validate(&github_justification(&issue_url()))
        .await
        .expect_err("a refused connection must be a fault");

    assert!(
        matches!(fault.cause(), JustificationError::AccessToken { .. }),
        "unexpected cause: {:?}",
        fault.cause()
    );
    let message = fault.to_string();
    assert!(
        message.starts_with("failed to get access token: token exchange transport failed"),
        "unexpected message: {message}"
    );
    assert!(!message.contains('\n'), "message should be one line: {message}");
}

#[rstest]
#[tokio::test]
async fn unreachable_issue_api_is_a_fault_without_backtrace() {
    let api_base = Url::parse(&refused_base_url()).expect("refused base URL should parse");
    let gateway =
        OctocrabIssueGateway::for_api_base(&api_base).expect("gateway should build");
    let reference = IssueReference::parse(&issue_url()).expect("issue URL should parse");
    let token = InstallationToken::new(INSTALLATION_TOKEN).expect("token should wrap");

    let error = gateway
        .issue(&reference, &token)
        .await
        .expect_err("a refused connection must fail the read");

    assert!(
        matches!(error, JustificationError::IssueLookup { .. }),
        "unexpected error: {error:?}"
    );
    assert!(!error.is_invalid_justification(), "must be a fault");
    let message = error.to_string();
    assert!(
        message.starts_with("failed to get issue info: issue failed: network error: "),
        "unexpected message: {message}"
    );
    assert!(!message.contains("Found at"), "backtrace leaked: {message}");
    assert!(!message.contains('\n'), "message should be one line: {message}");
    assert!(
        !message.contains(INSTALLATION_TOKEN),
        "token leaked: {message}"
    );
}

#[rstest]
#[tokio::test]
async fn undecodable_issue_body_is_a_fault() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
    )
    .mount(&server)
    .await;

    let fault = plugin_for(&server)
        .validate(&github_justification(&issue_url()))
        .await
        .expect_err("an undecodable body must be a fault");

    assert!(
        matches!(fault.cause(), JustificationError::IssueLookup { .. }),
        "unexpected cause: {:?}",
        fault.cause()
    );
}

#[rstest]
#[tokio::test]
async fn slow_issue_read_times_out_as_a_fault() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(200)
            .set_body_json(issue_body(NUMBER, "open"))
            .set_delay(Duration::from_secs(5)),
    )
    .mount(&server)
    .await;
    let plugin = plugin_with(PluginConfig {
        request_timeout_seconds: 1,
        ..test_plugin_config(&server.uri())
    });

    let fault = plugin
        .validate(&github_justification(&issue_url()))
        .await
        .expect_err("a timeout must be a fault");

    assert!(
        matches!(fault.cause(), JustificationError::IssueLookup { .. }),
        "unexpected cause: {:?}",
        fault.cause()
    );
    assert!(
        fault.to_string().contains("timed out"),
        "unexpected message: {fault}"
    );
}

#[rstest]
#[tokio::test]
async fn repeated_validation_gives_the_same_verdict() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(200).set_body_json(issue_body(NUMBER, "closed")),
    )
    .expect(2)
    .mount(&server)
    .await;
    let plugin = plugin_for(&server);
    let justification = github_justification(&issue_url());

    let first = plugin
        .validate(&justification)
        .await
        .expect("first validation should complete");
    let second = plugin
        .validate(&justification)
        .await
        .expect("second validation should complete");

    assert_eq!(first, second, "validation should be idempotent");
}

#[rstest]
#[tokio::test]
async fn app_assertion_is_reused_across_validations() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, NUMBER),
        ResponseTemplate::new(200).set_body_json(issue_body(NUMBER, "open")),
    )
    .mount(&server)
    .await;
    let plugin = plugin_for(&server);
    let justification = github_justification(&issue_url());

    for _ in 0..2 {
        plugin
            .validate(&justification)
            .await
            .expect("validation should complete");
    }

    let requests = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    let assertions: Vec<_> = requests
        .iter()
        .filter(|request| request.url.path() == access_tokens_path())
        .filter_map(|request| request.headers.get("authorization").cloned())
        .collect();

    assert_eq!(assertions.len(), 2, "each validation exchanges a token");
    assert_eq!(
        assertions.first(),
        assertions.last(),
        "the signed assertion should be reused within its window"
    );
}

#[rstest]
#[tokio::test]
async fn concurrent_validations_are_independent() {
    let server = MockServer::start().await;
    mount_token_exchange(&server).await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, 1),
        ResponseTemplate::new(200).set_body_json(issue_body(1, "open")),
    )
    .mount(&server)
    .await;
    issue_mock(
        &issue_path(OWNER, REPOSITORY, 2),
        ResponseTemplate::new(200).set_body_json(issue_body(2, "closed")),
    )
    .mount(&server)
    .await;
    let plugin = plugin_for(&server);
    let open = github_justification(&format!(
        "https://github.com/{OWNER}/{REPOSITORY}/issues/1"
    ));
    let closed = github_justification(&format!(
        "https://github.com/{OWNER}/{REPOSITORY}/issues/2"
    ));

    let (open_outcome, closed_outcome) =
        tokio::join!(plugin.validate(&open), plugin.validate(&closed));

    assert!(
        open_outcome.expect("open validation should complete").valid,
        "open issue should be accepted"
    );
    assert!(
        !closed_outcome
            .expect("closed validation should complete")
            .valid,
        "closed issue should be rejected"
    );
}

#[rstest]
#[tokio::test]
async fn display_metadata_comes_from_configuration() {
    let server = MockServer::start().await;

    let metadata = plugin_for(&server).display_metadata();

    assert_eq!(
        metadata,
        DisplayMetadata {
            display_name: "test DisplayName".to_owned(),
            hint: "test Hint".to_owned(),
        },
        "unexpected display metadata"
    );
}

#[rstest]
#[tokio::test]
async fn incomplete_configuration_fails_construction() {
    let config = PluginConfig {
        app_id: None,
        ..test_plugin_config("https://api.github.com")
    };

    let Err(error) = GitHubPlugin::from_config(&config) else {
        panic!("missing app id should be rejected");
    };

    assert_eq!(
        error,
        JustificationError::Configuration {
            message: "GITHUB_APP_ID is empty".to_owned(),
        },
        "unexpected error"
    );
}
