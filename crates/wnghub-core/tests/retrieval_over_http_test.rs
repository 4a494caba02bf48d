use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wnghub_core::{
    parse_page, Config, Error, GitHubNotifications, Notification, NotificationController,
    RetrievalRequest,
};

fn thread(id: usize, repo: &str, subject_type: &str) -> serde_json::Value {
    // Higher ids are older
    let updated_at = chrono::DateTime::from_timestamp(1_700_000_000 - id as i64 * 60, 0)
        .unwrap()
        .to_rfc3339();

    json!({
        "id": id.to_string(),
        "unread": true,
        "reason": "mention",
        "updated_at": updated_at,
        "subject": {
            "title": format!("Thread {}", id),
            "url": format!("https://api.github.com/repos/octo/{}/issues/{}", repo, id),
            "type": subject_type
        },
        "repository": {
            "name": repo,
            "full_name": format!("octo/{}", repo),
            "owner": { "login": "octo" }
        }
    })
}

fn page(ids: std::ops::Range<usize>, repo: &str) -> serde_json::Value {
    serde_json::Value::Array(ids.map(|i| thread(i, repo, "Issue")).collect())
}

async fn controller_for(server: &MockServer) -> NotificationController<GitHubNotifications> {
    let config = Config {
        auth_token: Some("test-token".into()),
        api_url: Some(server.uri()),
        ..Default::default()
    };
    NotificationController::new(GitHubNotifications::from_config(&config).unwrap())
}

#[tokio::test]
async fn test_two_pages_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..100, "wnghub")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notifications"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(100..140, "wnghub")))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let req = RetrievalRequest {
        num_results: 120,
        ..Default::default()
    };

    let result = controller.fetch(&req, &CancellationToken::new()).await.unwrap();

    assert_eq!(result.notifications.len(), 120);
    assert!(!result.cancelled);
    assert_eq!(
        result.notifications[0].html_url,
        "https://github.com/octo/wnghub/issues/0"
    );
}

#[tokio::test]
async fn test_repo_exclusion_over_http() {
    let server = MockServer::start().await;

    let records = vec![
        thread(1, "foo", "PullRequest"),
        thread(2, "bar", "Issue"),
        thread(3, "foo", "Issue"),
        thread(4, "bar", "PullRequest"),
    ];

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(records)))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let req = RetrievalRequest {
        num_results: 10,
        exclude_repos: Some(vec!["foo".into()]),
        ..Default::default()
    };

    let result = controller.fetch(&req, &CancellationToken::new()).await.unwrap();
    let repos: Vec<&str> = result
        .notifications
        .iter()
        .map(|n: &Notification| n.repository.as_str())
        .collect();

    assert_eq!(repos, vec!["bar", "bar"]);
}

#[tokio::test]
async fn test_unauthorized_makes_exactly_one_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let err = controller
        .fetch(&RetrievalRequest::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthError(_)));
}

#[tokio::test]
async fn test_server_error_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let err = controller
        .fetch(&RetrievalRequest::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UpstreamError { status: 502, .. }));
}

#[tokio::test]
async fn test_mark_read_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notifications/threads/5"))
        .respond_with(ResponseTemplate::new(205))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let raw = json!([thread(5, "wnghub", "Issue")]).to_string();
    let notifications = parse_page(raw.as_bytes()).unwrap();

    controller.mark_read(&notifications[0]).await.unwrap();
}

#[tokio::test]
async fn test_missing_token_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        api_url: Some(server.uri()),
        ..Default::default()
    };

    assert!(matches!(
        GitHubNotifications::from_config(&config),
        Err(Error::AuthError(_))
    ));
}
