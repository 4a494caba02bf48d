use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Largest `per_page` the notifications endpoint accepts
pub const MAX_PER_PAGE: u32 = 100;

/// GitHub notification thread, as returned by `GET /notifications`
///
/// Only the fields we actually read are declared. Everything else in the
/// payload is ignored so new API fields don't break parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationThread {
    pub id: String,
    pub repository: ThreadRepository,
    pub subject: ThreadSubject,
    pub reason: String,
    #[serde(default = "default_unread")]
    pub unread: bool,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_read_at: Option<DateTime<Utc>>,
}

fn default_unread() -> bool {
    true
}

/// Minimal repository info in a thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRepository {
    pub name: String,
    pub owner: ThreadOwner,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Repository owner in a thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadOwner {
    pub login: String,
}

/// Subject of the thread (Issue, PR, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadSubject {
    pub title: String,
    #[serde(rename = "type")]
    pub subject_type: String, // "Issue", "PullRequest", "Commit", "Release"
    #[serde(default)]
    pub url: Option<String>,
}

/// Query parameters for one page of `GET /notifications`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Include notifications already marked read
    pub all: bool,
    /// Only threads the user participates in or is mentioned in
    pub participating: bool,
    pub since: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            all: false,
            participating: false,
            since: None,
            before: None,
            page: 1,
            per_page: MAX_PER_PAGE,
        }
    }
}

impl NotificationQuery {
    /// Encode as query string pairs. Unset timestamps are left out entirely.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("all", self.all.to_string()),
            ("participating", self.participating.to_string()),
        ];

        if let Some(since) = self.since {
            pairs.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(before) = self.before {
            pairs.push(("before", before.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        pairs.push(("page", self.page.to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs
    }
}
