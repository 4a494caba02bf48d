// Reconciling explicit arguments, config defaults and built-in defaults
use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::filter::{AggregateFilter, OrgFilter, ReasonFilter, RepoFilter, TypeFilter};

pub const DEFAULT_NUM_RESULTS: usize = 5;
pub const DEFAULT_SINCE_DAYS: i64 = 5;

/// Fully reconciled parameters for one retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    /// How many notifications to return after filtering
    pub num_results: usize,
    pub include_repos: Option<Vec<String>>,
    pub exclude_repos: Option<Vec<String>>,
    pub include_orgs: Option<Vec<String>>,
    pub exclude_orgs: Option<Vec<String>>,
    pub include_reasons: Option<Vec<String>>,
    pub exclude_reasons: Option<Vec<String>>,
    /// Also return notifications already marked read
    pub all: bool,
    pub participating: bool,
    pub since: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub show_issues: bool,
    pub show_prs: bool,
}

impl Default for RetrievalRequest {
    /// Built-in defaults, minus the time window (which needs a clock)
    fn default() -> Self {
        Self {
            num_results: DEFAULT_NUM_RESULTS,
            include_repos: None,
            exclude_repos: None,
            include_orgs: None,
            exclude_orgs: None,
            include_reasons: None,
            exclude_reasons: None,
            all: false,
            participating: false,
            since: None,
            before: None,
            show_issues: true,
            show_prs: true,
        }
    }
}

/// Whatever the caller passed explicitly; `None` defers to config
#[derive(Debug, Clone, Default)]
pub struct RequestArgs {
    pub num_results: Option<usize>,
    pub include_repos: Option<Vec<String>>,
    pub exclude_repos: Option<Vec<String>>,
    pub include_orgs: Option<Vec<String>>,
    pub exclude_orgs: Option<Vec<String>>,
    pub include_reasons: Option<Vec<String>>,
    pub exclude_reasons: Option<Vec<String>>,
    pub all: Option<bool>,
    pub participating: Option<bool>,
    pub since: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub show_issues: Option<bool>,
    pub show_prs: Option<bool>,
}

impl RetrievalRequest {
    /// Explicit argument, then config value, then built-in default
    pub fn reconcile(args: RequestArgs, config: &Config, now: DateTime<Utc>) -> Self {
        let defaults = Self::default();

        Self {
            num_results: args
                .num_results
                .or(config.show_num_results)
                .unwrap_or(defaults.num_results),
            include_repos: args.include_repos.or_else(|| config.only_include_repos.clone()),
            exclude_repos: args.exclude_repos.or_else(|| config.exclude_repos.clone()),
            include_orgs: args.include_orgs.or_else(|| config.only_include_orgs.clone()),
            exclude_orgs: args.exclude_orgs.or_else(|| config.exclude_orgs.clone()),
            include_reasons: args
                .include_reasons
                .or_else(|| config.only_include_reasons.clone()),
            exclude_reasons: args.exclude_reasons.or_else(|| config.exclude_reasons.clone()),
            all: args.all.or(config.show_read_results).unwrap_or(defaults.all),
            participating: args
                .participating
                .or(config.only_include_participating)
                .unwrap_or(defaults.participating),
            since: args
                .since
                .or(config.only_include_since)
                .or_else(|| Some(now - Duration::days(DEFAULT_SINCE_DAYS))),
            before: args.before.or(config.only_include_before),
            show_issues: args
                .show_issues
                .or(config.include_issues)
                .unwrap_or(defaults.show_issues),
            show_prs: args
                .show_prs
                .or(config.include_prs)
                .unwrap_or(defaults.show_prs),
        }
    }

    /// Build the filter chain for this request
    ///
    /// Include and exclude sets for the same dimension become separate
    /// members, so both have to pass. The type filter is always present.
    pub fn build_filter(&self) -> AggregateFilter {
        let mut filter = AggregateFilter::default();

        if let Some(repos) = &self.include_repos {
            filter.push(RepoFilter::new(repos.iter().cloned(), false));
        }
        if let Some(repos) = &self.exclude_repos {
            filter.push(RepoFilter::new(repos.iter().cloned(), true));
        }
        if let Some(orgs) = &self.include_orgs {
            filter.push(OrgFilter::new(orgs.iter().cloned(), false));
        }
        if let Some(orgs) = &self.exclude_orgs {
            filter.push(OrgFilter::new(orgs.iter().cloned(), true));
        }
        if let Some(reasons) = &self.include_reasons {
            filter.push(ReasonFilter::new(reasons.iter().cloned(), false));
        }
        if let Some(reasons) = &self.exclude_reasons {
            filter.push(ReasonFilter::new(reasons.iter().cloned(), true));
        }
        filter.push(TypeFilter::new(self.show_prs, self.show_issues));

        filter
    }
}
