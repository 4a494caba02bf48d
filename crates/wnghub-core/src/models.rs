use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wnghub_api::NotificationThread;

const TITLE_MAX_CHARS: usize = 40;

/// One GitHub notification thread, flattened for filtering and display
///
/// Built once per raw record and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    /// Bare repository name, without the owner
    pub repository: String,
    /// Owner login of the repository
    pub org: String,
    /// Browser link to the pull request or issue
    pub html_url: String,
    pub reason: String,
    pub is_pull: bool,
    pub is_issue: bool,
    pub unread: bool,
    pub updated_at: DateTime<Utc>,
    pub thread_id: String,
}

impl Notification {
    /// Title cut down to fit a table cell
    pub fn abbrev_title(&self) -> String {
        if self.title.chars().count() <= TITLE_MAX_CHARS {
            return self.title.clone();
        }
        let cut: String = self.title.chars().take(TITLE_MAX_CHARS - 3).collect();
        format!("{}...", cut)
    }

    /// Short label for the subject type
    pub fn kind(&self) -> &'static str {
        if self.is_pull {
            "PR"
        } else if self.is_issue {
            "Issue"
        } else {
            "Other"
        }
    }
}

impl From<NotificationThread> for Notification {
    fn from(thread: NotificationThread) -> Self {
        let is_pull = thread.subject.subject_type == "PullRequest";
        let is_issue = thread.subject.subject_type == "Issue";
        let html_url = thread
            .subject
            .url
            .as_deref()
            .map(api_url_to_html_url)
            .unwrap_or_default();

        Notification {
            title: thread.subject.title,
            // The payload already tells us; no need to go slicing up URLs
            repository: thread.repository.name,
            org: thread.repository.owner.login,
            html_url,
            reason: thread.reason,
            is_pull,
            is_issue,
            unread: thread.unread,
            updated_at: thread.updated_at,
            thread_id: thread.id,
        }
    }
}

/// Turn a REST resource URL into the matching web URL
///
/// `https://api.github.com/repos/o/r/pulls/1` becomes
/// `https://github.com/o/r/pull/1`. Enterprise hosts serve the API under
/// `/api/v3`, which is stripped the same way. Anything that doesn't look
/// like an API URL is returned as is.
pub fn api_url_to_html_url(api_url: &str) -> String {
    let Some((scheme, rest)) = api_url.split_once("://") else {
        return api_url.to_string();
    };
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));

    let (host, path) = if let Some(web_host) = host.strip_prefix("api.") {
        (web_host, path)
    } else if let Some(stripped) = path.strip_prefix("api/v3/") {
        (host, stripped)
    } else {
        return api_url.to_string();
    };

    let Some(path) = path.strip_prefix("repos/") else {
        return api_url.to_string();
    };

    let mut segments: Vec<&str> = path.split('/').collect();
    if segments.len() > 2 && segments[2] == "pulls" {
        segments[2] = "pull";
    }

    format!("{}://{}/{}", scheme, host, segments.join("/"))
}
