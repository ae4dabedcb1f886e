//! End-to-end dispatch tests: orchestrator, adapters, retrying transport and
//! the blocking GraphQL client against a mock backend.

use housing_contact::adapters::Launcher;
use housing_contact::transport::{AsyncGraphqlClient, AsyncTransport, RetryingTransport};
use housing_contact::{
    Config, ContactDispatcher, ContactRequestOptions, GraphqlClient, Metrics, RetryPolicy,
    SendEmailOptions, SendSmsOptions,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
}

impl Launcher for RecordingLauncher {
    fn open_url(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }

    fn show_number(&self, _number: &str) {}
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
    }
}

fn build(server: &ServerGuard, token: Option<&str>) -> (ContactDispatcher, Metrics) {
    let config = Config {
        api_base_url: server.url(),
        api_token: token.map(str::to_string),
        ..Config::default()
    };

    let client = GraphqlClient::new(&config);
    let metrics = client.metrics().clone();
    let transport = Arc::new(
        RetryingTransport::new(AsyncGraphqlClient::new(client), fast_policy())
            .with_metrics(metrics.clone()),
    ) as Arc<dyn AsyncTransport>;

    let dispatcher =
        ContactDispatcher::from_config(&config, transport, Arc::new(RecordingLauncher::default()));
    (dispatcher, metrics)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_email_delivered_with_bearer_token() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/graphql")
        .match_header("authorization", "Bearer jwt-123")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"emailData": {"to": "landlord@example.com", "subject": "Room"}}
        })))
        .with_status(200)
        .with_body(r#"{"data": {"sendEmail": {"success": true, "messageId": "m-9"}}}"#)
        .create_async()
        .await;

    let (dispatcher, _metrics) = build(&server, Some("jwt-123"));
    let result = dispatcher
        .send_email(SendEmailOptions {
            to: "landlord@example.com".to_string(),
            subject: "Room".to_string(),
            message: "Is it still free?".to_string(),
            from: Some("student@uni.edu".to_string()),
        })
        .await;

    mock.assert_async().await;
    assert!(result.is_success());
    assert_eq!(result.data().unwrap()["messageId"], "m-9");

    let state = dispatcher.state();
    assert!(!state.loading);
    assert_eq!(state.last_success_message.as_deref(), Some("Email sent successfully!"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_errors_are_retried_then_reported() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/graphql")
        .with_status(503)
        .with_body("unavailable")
        .expect(3)
        .create_async()
        .await;

    let (dispatcher, metrics) = build(&server, None);
    let result = dispatcher
        .send_sms(SendSmsOptions {
            to: "+44 7700 900123".to_string(),
            message: "Hello".to_string(),
            from: None,
        })
        .await;

    mock.assert_async().await;
    assert_eq!(result.error(), Some("HTTP error! status: 503"));
    assert_eq!(metrics.http_requests_total(), 3);
    assert_eq!(metrics.retries_total(), 2);
    assert_eq!(
        dispatcher.state().last_error.as_deref(),
        Some("HTTP error! status: 503")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_expired_token_fails_after_one_attempt() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(
            r#"{"errors": [{"message": "Token expired", "extensions": {"code": "UNAUTHENTICATED"}}]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let (dispatcher, metrics) = build(&server, Some("stale"));
    let result = dispatcher
        .send_email(SendEmailOptions {
            to: "landlord@example.com".to_string(),
            subject: String::new(),
            message: "Hi".to_string(),
            from: None,
        })
        .await;

    mock.assert_async().await;
    assert_eq!(result.error(), Some("Token expired"));
    assert_eq!(metrics.auth_failures_total(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_backend_reports_unsuccessful_send() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": {"sendSMS": {"success": false}}}"#)
        .create_async()
        .await;

    let (dispatcher, _metrics) = build(&server, None);
    let result = dispatcher
        .send_sms(SendSmsOptions {
            to: "555-0100".to_string(),
            message: "Hi".to_string(),
            from: None,
        })
        .await;

    assert_eq!(result.error(), Some("Failed to send SMS"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_contact_request_sends_email_and_sms() {
    let mut server = Server::new_async().await;

    let email_mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"emailData": {
                "to": "landlord@example.com",
                "subject": "New inquiry about Studio near campus",
                "from": "ana@uni.edu"
            }}
        })))
        .with_status(200)
        .with_body(r#"{"data": {"sendEmail": {"success": true}}}"#)
        .create_async()
        .await;

    let sms_mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"smsData": {
                "to": "+44 7700 900123",
                "message": "New inquiry from Ana about Studio near campus. Check your email for details."
            }}
        })))
        .with_status(200)
        .with_body(r#"{"data": {"sendSMS": {"success": true}}}"#)
        .create_async()
        .await;

    let (dispatcher, _metrics) = build(&server, Some("jwt"));
    let outcome = dispatcher
        .send_contact_request(ContactRequestOptions {
            recipient_email: "landlord@example.com".to_string(),
            recipient_phone: "+44 7700 900123".to_string(),
            sender_name: "Ana".to_string(),
            sender_email: "ana@uni.edu".to_string(),
            sender_phone: Some("+34 600 000 000".to_string()),
            listing_title: "Studio near campus".to_string(),
            message: "Is it available in September?".to_string(),
        })
        .await;

    email_mock.assert_async().await;
    sms_mock.assert_async().await;
    assert!(outcome.is_success());
    assert!(!outcome.is_partial());
    assert_eq!(
        dispatcher.state().last_success_message.as_deref(),
        Some("Contact request sent successfully!")
    );
}
