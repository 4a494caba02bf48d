// Raw notifications page -> typed, newest-first notifications
use wnghub_api::NotificationThread;

use crate::{models::Notification, Result};

/// Parse one page of `GET /notifications` output
///
/// Fails on malformed JSON or a record missing its subject/repository
/// fields. The result is sorted by `updated_at`, newest first; retrieval
/// relies on that order when trimming the last page to an exact count.
pub fn parse_page(raw: &[u8]) -> Result<Vec<Notification>> {
    let threads: Vec<NotificationThread> = serde_json::from_slice(raw)?;

    let mut notifications: Vec<Notification> =
        threads.into_iter().map(Notification::from).collect();
    notifications.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    Ok(notifications)
}
