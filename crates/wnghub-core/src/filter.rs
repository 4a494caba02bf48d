// Composable predicates over notifications
use std::collections::HashSet;

use crate::models::Notification;

/// A pure predicate deciding whether a notification is kept
pub trait NotificationFilter: Send + Sync {
    fn include(&self, notification: &Notification) -> bool;

    /// Keep only the notifications this filter includes, preserving order
    fn apply(&self, notifications: Vec<Notification>) -> Vec<Notification> {
        notifications
            .into_iter()
            .filter(|n| self.include(n))
            .collect()
    }
}

/// Set membership with an include/exclude switch
///
/// Shared by the reason, repo and org filters, which differ only in the
/// field they look at.
#[derive(Debug, Clone)]
struct Membership {
    values: HashSet<String>,
    exclude: bool,
}

impl Membership {
    fn new<I, S>(values: I, exclude: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            exclude,
        }
    }

    fn admits(&self, value: &str) -> bool {
        self.values.contains(value) != self.exclude
    }
}

/// Filter on the notification reason ("mention", "review_requested", ...)
#[derive(Debug, Clone)]
pub struct ReasonFilter(Membership);

impl ReasonFilter {
    pub fn new<I, S>(reasons: I, exclude: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Membership::new(reasons, exclude))
    }
}

impl NotificationFilter for ReasonFilter {
    fn include(&self, notification: &Notification) -> bool {
        self.0.admits(&notification.reason)
    }
}

/// Filter on the bare repository name
#[derive(Debug, Clone)]
pub struct RepoFilter(Membership);

impl RepoFilter {
    pub fn new<I, S>(repos: I, exclude: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Membership::new(repos, exclude))
    }
}

impl NotificationFilter for RepoFilter {
    fn include(&self, notification: &Notification) -> bool {
        self.0.admits(&notification.repository)
    }
}

/// Filter on the repository owner
#[derive(Debug, Clone)]
pub struct OrgFilter(Membership);

impl OrgFilter {
    pub fn new<I, S>(orgs: I, exclude: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Membership::new(orgs, exclude))
    }
}

impl NotificationFilter for OrgFilter {
    fn include(&self, notification: &Notification) -> bool {
        self.0.admits(&notification.org)
    }
}

/// Pull request vs issue
///
/// With both flags off nothing passes. Yes, you can hide everything if you
/// really want to. Subjects that are neither a PR nor an issue (releases,
/// commits) never pass.
#[derive(Debug, Clone, Copy)]
pub struct TypeFilter {
    pub want_pulls: bool,
    pub want_issues: bool,
}

impl TypeFilter {
    pub fn new(want_pulls: bool, want_issues: bool) -> Self {
        Self {
            want_pulls,
            want_issues,
        }
    }
}

impl NotificationFilter for TypeFilter {
    fn include(&self, notification: &Notification) -> bool {
        (self.want_pulls && notification.is_pull) || (self.want_issues && notification.is_issue)
    }
}

/// Logical AND over a list of filters
///
/// An empty aggregate includes everything.
#[derive(Default)]
pub struct AggregateFilter {
    filters: Vec<Box<dyn NotificationFilter>>,
}

impl AggregateFilter {
    pub fn new(filters: Vec<Box<dyn NotificationFilter>>) -> Self {
        Self { filters }
    }

    pub fn push(&mut self, filter: impl NotificationFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl NotificationFilter for AggregateFilter {
    fn include(&self, notification: &Notification) -> bool {
        self.filters.iter().all(|f| f.include(notification))
    }
}
