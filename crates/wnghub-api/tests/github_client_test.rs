use std::time::Duration;

use chrono::{TimeZone, Utc};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wnghub_api::{GitHubClient, GitHubError, NotificationQuery};

#[tokio::test]
async fn test_list_notifications_sends_query_and_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .and(query_param("all", "true"))
        .and(query_param("participating", "false"))
        .and(query_param("since", "2024-01-02T03:04:05Z"))
        .and(query_param_is_missing("before"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("test-token", mock_server.uri()).unwrap();
    let query = NotificationQuery {
        all: true,
        since: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
        page: 2,
        ..Default::default()
    };

    let body = client.list_notifications(&query).await.unwrap();
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_list_notifications_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Bad credentials"}"#))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("bad", mock_server.uri()).unwrap();
    let err = client
        .list_notifications(&NotificationQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::Unauthorized));
}

#[tokio::test]
async fn test_list_notifications_other_status_is_request_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("token", mock_server.uri()).unwrap();
    let err = client
        .list_notifications(&NotificationQuery::default())
        .await
        .unwrap_err();

    match err {
        GitHubError::RequestFailed { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "down for maintenance");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_mark_thread_read_accepts_205_and_304() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notifications/threads/1"))
        .respond_with(ResponseTemplate::new(205))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/notifications/threads/2"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("token", mock_server.uri()).unwrap();
    assert!(client.mark_thread_read("1").await.is_ok());
    assert!(client.mark_thread_read("2").await.is_ok());
}

#[tokio::test]
async fn test_mark_thread_read_rejects_plain_200() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notifications/threads/7"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_url("token", mock_server.uri()).unwrap();
    let err = client.mark_thread_read("7").await.unwrap_err();

    assert!(matches!(err, GitHubError::RequestFailed { status: 200, .. }));
}

#[test]
fn test_token_with_newline_is_rejected() {
    let result = GitHubClient::new("abc\ndef");
    assert!(matches!(result, Err(GitHubError::InvalidToken(_))));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notifications/threads/9"))
        .respond_with(ResponseTemplate::new(205).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client =
        GitHubClient::with_timeout("token", mock_server.uri(), Duration::from_millis(100))
            .unwrap();
    let err = client.mark_thread_read("9").await.unwrap_err();

    match err {
        GitHubError::NetworkError(e) => assert!(e.is_timeout()),
        other => panic!("expected a timeout, got {:?}", other),
    }
}
