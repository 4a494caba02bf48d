// GitHub REST client for the notifications endpoints
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::notifications::NotificationQuery;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Upper bound on a single request, connect through body
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Bad credentials (HTTP 401)")]
    Unauthorized,

    #[error("API request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid auth token: {0}")]
    InvalidToken(String),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise, or a mock server in tests
    pub fn with_base_url(token: &str, base_url: String) -> Result<Self> {
        Self::with_timeout(token, base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Same as `with_base_url`, but a request that takes longer than
    /// `timeout` fails with a network error instead of hanging forever
    pub fn with_timeout(token: &str, base_url: String, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "wnghub/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| GitHubError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of notifications and hand back the raw JSON body
    ///
    /// The body is returned untouched; turning it into typed notifications
    /// is the caller's job so a malformed page surfaces as a parse error
    /// rather than a transport error.
    pub async fn list_notifications(&self, query: &NotificationQuery) -> Result<String> {
        let url = format!("{}/notifications", self.base_url);
        debug!("GET {} page={} per_page={}", url, query.page, query.per_page);

        let response = self
            .client
            .get(&url)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(GitHubError::Unauthorized);
        }

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }

    /// Mark a notification thread as read
    ///
    /// GitHub answers 205 Reset Content on success and 304 when the thread
    /// was already read. Both count as success.
    pub async fn mark_thread_read(&self, thread_id: &str) -> Result<()> {
        let url = format!(
            "{}/notifications/threads/{}",
            self.base_url,
            urlencoding::encode(thread_id)
        );
        debug!("PATCH {}", url);

        let response = self.client.patch(&url).send().await?;
        let status = response.status();

        match status {
            StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED => Ok(()),
            StatusCode::UNAUTHORIZED => Err(GitHubError::Unauthorized),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(GitHubError::RequestFailed {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
