use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wnghub_api::{NotificationQuery, MAX_PER_PAGE};

use crate::{
    filter::NotificationFilter, models::Notification, parser::parse_page,
    request::RetrievalRequest, Error, Result,
};

/// Where raw notification pages come from
///
/// The production implementation talks HTTP to GitHub; tests swap in a
/// mock so paging behaviour can be checked call by call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// One page of `GET /notifications`, as the raw JSON body
    async fn list_notifications(&self, query: &NotificationQuery) -> Result<String>;

    /// Mark a thread as read
    async fn update_thread_status(&self, thread_id: &str) -> Result<()>;
}

/// What a `fetch` produced
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    /// Newest first, never longer than the requested count
    pub notifications: Vec<Notification>,
    /// True when the run was stopped by the cancellation token; the
    /// notifications collected up to that point are still returned
    pub cancelled: bool,
}

/// What a `mark_all_read` got through before finishing or being stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkedRead {
    pub marked: usize,
    pub cancelled: bool,
}

/// Pages through notifications until enough survive the filters
pub struct NotificationController<S> {
    source: S,
    per_page: u32,
}

impl<S: NotificationSource> NotificationController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            per_page: MAX_PER_PAGE,
        }
    }

    /// Override the page size. Checked against the API maximum on `fetch`.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch up to `req.num_results` notifications that pass the filters
    ///
    /// Pages are requested strictly one after another: whether another
    /// page is needed depends on how many of the previous ones survived
    /// filtering. Stops when the count is reached, when a page comes back
    /// short (nothing left upstream), or when `cancel` fires.
    pub async fn fetch(
        &self,
        req: &RetrievalRequest,
        cancel: &CancellationToken,
    ) -> Result<Retrieval> {
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(Error::ConfigError(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }

        let filter = req.build_filter();
        let mut accumulated: Vec<Notification> = Vec::new();
        let mut remaining = req.num_results;
        let mut page = 1;
        let mut pages_fetched = 0;

        while remaining > 0 {
            if cancel.is_cancelled() {
                return Ok(self.cancelled(accumulated));
            }

            let query = NotificationQuery {
                all: req.all,
                participating: req.participating,
                since: req.since,
                before: req.before,
                page,
                per_page: self.per_page,
            };

            let body = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(self.cancelled(accumulated)),
                body = self.source.list_notifications(&query) => body?,
            };

            pages_fetched += 1;

            let parsed = parse_page(body.as_bytes())?;
            let raw_count = parsed.len();
            let mut accepted = filter.apply(parsed);
            debug!(
                "Page {}: {} raw, {} passed filters, {} still wanted",
                page,
                raw_count,
                accepted.len(),
                remaining
            );

            if accepted.len() > remaining {
                accepted.truncate(remaining);
            }
            remaining -= accepted.len();
            accumulated.append(&mut accepted);

            // A short page means GitHub ran dry; asking again just burns rate limit
            if raw_count < self.per_page as usize {
                debug!("Short page, no more notifications upstream");
                break;
            }
            page += 1;
        }

        info!(
            "Fetched {} notifications across {} page(s)",
            accumulated.len(),
            pages_fetched
        );

        Ok(Retrieval {
            notifications: accumulated,
            cancelled: false,
        })
    }

    /// Mark the notification's thread as read
    pub async fn mark_read(&self, notification: &Notification) -> Result<()> {
        if notification.thread_id.is_empty() {
            return Err(Error::ThreadIdMissing);
        }

        self.source
            .update_thread_status(&notification.thread_id)
            .await?;
        debug!("Marked thread {} as read", notification.thread_id);
        Ok(())
    }

    /// Mark each notification read, one request at a time
    ///
    /// Every request is raced against `cancel`. Once it fires, the one in
    /// flight is dropped and nothing after it is touched. The first
    /// upstream error stops the run.
    pub async fn mark_all_read(
        &self,
        notifications: &[Notification],
        cancel: &CancellationToken,
    ) -> Result<MarkedRead> {
        let mut marked = 0;

        for notification in notifications {
            if cancel.is_cancelled() {
                return Ok(self.marking_cancelled(marked, notifications.len()));
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Ok(self.marking_cancelled(marked, notifications.len()));
                }
                res = self.mark_read(notification) => res?,
            }
            marked += 1;
        }

        Ok(MarkedRead {
            marked,
            cancelled: false,
        })
    }

    /// GitHub has no endpoint for this
    pub async fn mark_unread(&self, _notification: &Notification) -> Result<()> {
        Err(Error::NotSupported(
            "GitHub's API cannot mark a notification as unread".into(),
        ))
    }

    fn marking_cancelled(&self, marked: usize, total: usize) -> MarkedRead {
        warn!("Marking cancelled after {} of {} threads", marked, total);
        MarkedRead {
            marked,
            cancelled: true,
        }
    }

    fn cancelled(&self, notifications: Vec<Notification>) -> Retrieval {
        warn!(
            "Retrieval cancelled, returning {} notifications collected so far",
            notifications.len()
        );
        Retrieval {
            notifications,
            cancelled: true,
        }
    }
}
