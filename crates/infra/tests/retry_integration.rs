//! Refresh-on-401 behaviour of the full client stack
//!
//! Each test drives `ApiClient` against wiremock. Responses are keyed on the
//! bearer token so a retry is only served once the credential was actually
//! refreshed.

mod support;

use afero_infra::api::{ApiError, EndpointRequest};
use afero_infra::AuthSession;
use serde_json::json;
use support::{Harness, INITIAL_TOKEN, REFRESHED_TOKEN};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

const ME: &str = "/v1/users/me";

fn user_json() -> serde_json::Value {
    json!({ "userId": "u1", "credentialId": "jane@x.com" })
}

#[tokio::test]
async fn test_server_errors_do_not_refresh() {
    for status in [500, 503] {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path(ME))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&h.server)
            .await;

        let error = h.client.fetch_account_info().await.unwrap_err();

        assert_eq!(error.status(), Some(status));
        assert_eq!(h.oauth.refresh_count(), 0);
    }
}

#[tokio::test]
async fn test_forbidden_does_not_refresh() {
    let h = Harness::new().await;
    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&h.server)
        .await;

    let error = h.client.fetch_account_info().await.unwrap_err();

    assert_eq!(error.status(), Some(403));
    assert_eq!(h.oauth.refresh_count(), 0);
    assert_eq!(h.access_token().await.as_deref(), Some(INITIAL_TOKEN));
}

/// One 401, then the retried call succeeds with the refreshed token.
#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_once() {
    let h = Harness::new().await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", Harness::bearer(INITIAL_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", Harness::bearer(REFRESHED_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&h.server)
        .await;

    let user = h.client.fetch_account_info().await.unwrap();

    assert_eq!(user.user_id, "u1");
    assert_eq!(h.oauth.refresh_count(), 1);
    assert_eq!(h.oauth.last_refresh_token().as_deref(), Some("r1"));
    assert_eq!(h.access_token().await.as_deref(), Some(REFRESHED_TOKEN));
}

#[tokio::test]
async fn test_unauthorized_without_refresh_flag_is_surfaced() {
    let h = Harness::new().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    let request = EndpointRequest::get(ME).attempt_refresh(false);
    let error = h.client.execute(&request).await.unwrap_err();

    assert!(error.is_unauthorized());
    assert_eq!(h.oauth.refresh_count(), 0);
    assert!(h.auth.is_signed_in().await);
}

#[tokio::test]
async fn test_second_unauthorized_is_returned_without_another_refresh() {
    let h = Harness::new().await;
    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(ResponseTemplate::new(401).set_body_string("still no"))
        .expect(2)
        .mount(&h.server)
        .await;

    let error = h.client.fetch_account_info().await.unwrap_err();

    assert_eq!(error.status(), Some(401));
    assert!(error.to_string().contains("still no"));
    assert_eq!(h.oauth.refresh_count(), 1);
}

/// A rejected refresh signs out and reports the API's 401, not the token
/// endpoint's.
#[tokio::test]
async fn test_failed_refresh_signs_out_and_surfaces_original_error() {
    let h = Harness::new().await;
    h.oauth.set_should_fail(true);
    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&h.server)
        .await;

    let error = h.client.fetch_account_info().await.unwrap_err();

    match error {
        ApiError::Http { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains(ME), "{message}");
            assert!(message.contains("token expired"), "{message}");
        }
        other => panic!("expected the API 401, got {other:?}"),
    }
    assert_eq!(h.oauth.refresh_count(), 1);
    assert!(!h.client.is_signed_in().await);
}

/// Callers rejected with the same token share a single refresh.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_unauthorized_calls_refresh_once() {
    let h = Harness::new().await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", Harness::bearer(INITIAL_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME))
        .and(header("authorization", Harness::bearer(REFRESHED_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&h.server)
        .await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = h.client.clone();
            tokio::spawn(async move { client.fetch_account_info().await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().user_id, "u1");
    }
    assert_eq!(h.oauth.refresh_count(), 1);
}

#[tokio::test]
async fn test_signed_out_client_sends_no_bearer() {
    let h = Harness::new().await;
    h.client.sign_out().await.unwrap();
    Mock::given(method("GET"))
        .and(path(ME))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    let error = h.client.fetch_account_info().await.unwrap_err();

    // Refresh has no credential to work with, so the 401 is surfaced
    assert_eq!(error.status(), Some(401));
    assert_eq!(h.oauth.refresh_count(), 0);
    let requests = h.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}
