use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wnghub_core::{
    view::default_columns, Config, GitHubNotifications, JsonRenderer, NotificationController,
    OutputFormat, Renderer, RequestArgs, RetrievalRequest, TableRenderer,
};

const FALLBACK_TERMINAL_WIDTH: u16 = 80;

#[derive(Parser)]
#[command(name = "wnghub")]
#[command(version, about = "Your GitHub notifications, filtered, in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List notifications (default when no command is given)
    List(ListArgs),
    /// Store a GitHub personal access token
    SetAuth {
        /// Token with the `notifications` scope
        token: String,
    },
    /// Remove the stored token
    ClearAuth,
    /// Read or change the stored defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print a config value
    Get { field: String },
    /// Set a config value; an empty value clears it
    Set { field: String, value: String },
    /// Print where the config file lives
    Path,
}

#[derive(clap::Args, Default)]
struct ListArgs {
    /// Number of notifications to show
    #[arg(short = 'n', long = "num")]
    num: Option<usize>,

    /// Only show these repositories (repeatable)
    #[arg(long = "repo", value_name = "REPO")]
    repos: Vec<String>,

    /// Hide these repositories (repeatable)
    #[arg(long = "exclude-repo", value_name = "REPO")]
    exclude_repos: Vec<String>,

    /// Only show repositories owned by these orgs/users (repeatable)
    #[arg(long = "org", value_name = "ORG")]
    orgs: Vec<String>,

    /// Hide repositories owned by these orgs/users (repeatable)
    #[arg(long = "exclude-org", value_name = "ORG")]
    exclude_orgs: Vec<String>,

    /// Only show these reasons, e.g. mention, review_requested (repeatable)
    #[arg(long = "reason", value_name = "REASON")]
    reasons: Vec<String>,

    /// Hide these reasons (repeatable)
    #[arg(long = "exclude-reason", value_name = "REASON")]
    exclude_reasons: Vec<String>,

    /// Include notifications already marked read
    #[arg(short, long, overrides_with = "unread")]
    all: bool,

    /// Only unread notifications, even if the config says otherwise
    #[arg(long, overrides_with = "all")]
    unread: bool,

    /// Only threads you participate in or are mentioned in
    #[arg(short, long, overrides_with = "no_participating")]
    participating: bool,

    /// Every subscribed thread, even if the config says participating only
    #[arg(long, overrides_with = "participating")]
    no_participating: bool,

    /// Only notifications updated after this time (RFC 3339)
    #[arg(long, value_parser = parse_timestamp)]
    since: Option<DateTime<Utc>>,

    /// Only notifications updated before this time (RFC 3339)
    #[arg(long, value_parser = parse_timestamp)]
    before: Option<DateTime<Utc>>,

    /// Show issues, even if the config hides them
    #[arg(long, overrides_with = "no_issues")]
    issues: bool,

    /// Hide issues
    #[arg(long, overrides_with = "issues")]
    no_issues: bool,

    /// Show pull requests, even if the config hides them
    #[arg(long, overrides_with = "no_prs")]
    prs: bool,

    /// Hide pull requests
    #[arg(long, overrides_with = "prs")]
    no_prs: bool,

    /// Give up after this many seconds and show what was fetched so far
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Mark the listed notifications as read afterwards
    #[arg(long)]
    mark_read: bool,
}

impl ListArgs {
    /// Flags left at their defaults defer to the config file
    fn to_request_args(&self) -> RequestArgs {
        RequestArgs {
            num_results: self.num,
            include_repos: non_empty(&self.repos),
            exclude_repos: non_empty(&self.exclude_repos),
            include_orgs: non_empty(&self.orgs),
            exclude_orgs: non_empty(&self.exclude_orgs),
            include_reasons: non_empty(&self.reasons),
            exclude_reasons: non_empty(&self.exclude_reasons),
            all: toggle(self.all, self.unread),
            participating: toggle(self.participating, self.no_participating),
            since: self.since,
            before: self.before,
            show_issues: toggle(self.issues, self.no_issues),
            show_prs: toggle(self.prs, self.no_prs),
        }
    }
}

/// Neither half of an on/off flag pair given? Then the config decides.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp like 2024-01-31T09:00:00Z ({})", e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so piping the table or JSON stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command.unwrap_or_else(|| Commands::List(ListArgs::default())) {
        Commands::List(args) => list(&config, &args).await?,
        Commands::SetAuth { token } => {
            config.set_auth(Some(token));
            config.save()?;
            println!("Auth token saved.");
        }
        Commands::ClearAuth => {
            config.set_auth(None);
            config.save()?;
            println!("Auth token removed.");
        }
        Commands::Config { action } => match action {
            ConfigAction::Get { field } => println!("{}", config.get_field(&field)?),
            ConfigAction::Set { field, value } => {
                config.set_field(&field, &value)?;
                config.save()?;
            }
            ConfigAction::Path => println!("{}", Config::config_path()?.display()),
        },
    }

    Ok(())
}

async fn list(config: &Config, args: &ListArgs) -> anyhow::Result<()> {
    let source = GitHubNotifications::from_config(config)?;
    let mut controller = NotificationController::new(source);
    if let Some(per_page) = config.per_page {
        controller = controller.with_per_page(per_page);
    }

    let request = RetrievalRequest::reconcile(args.to_request_args(), config, Utc::now());
    tracing::debug!("Reconciled request: {:?}", request);

    let cancel = CancellationToken::new();
    spawn_cancel_on_ctrl_c(cancel.clone());
    if let Some(secs) = args.timeout {
        spawn_cancel_after(cancel.clone(), Duration::from_secs(secs));
    }

    let retrieval = controller.fetch(&request, &cancel).await?;
    if retrieval.cancelled {
        eprintln!("Stopped early; showing the notifications fetched so far.");
    }

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let rendered = match format {
        OutputFormat::Json => JsonRenderer.render(&retrieval.notifications, &[])?,
        OutputFormat::Table => TableRenderer::new(terminal_width())
            .render(&retrieval.notifications, &default_columns())?,
    };
    println!("{}", rendered);

    // Same token as the fetch: Ctrl-C and --timeout still count here
    if args.mark_read && !cancel.is_cancelled() {
        let outcome = controller
            .mark_all_read(&retrieval.notifications, &cancel)
            .await?;
        if outcome.cancelled {
            eprintln!(
                "Stopped early; marked {} of {} notification(s) as read.",
                outcome.marked,
                retrieval.notifications.len()
            );
        } else {
            eprintln!("Marked {} notification(s) as read.", outcome.marked);
        }
    }

    Ok(())
}

fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .map(|(cols, _)| cols)
        .unwrap_or(FALLBACK_TERMINAL_WIDTH)
}

fn spawn_cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

fn spawn_cancel_after(cancel: CancellationToken, after: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        cancel.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unset_flags_defer_to_config() {
        let cli = Cli::parse_from(["wnghub", "list"]);
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list command");
        };
        let req = args.to_request_args();

        assert!(req.num_results.is_none());
        assert!(req.include_repos.is_none());
        assert!(req.all.is_none());
        assert!(req.show_prs.is_none());
    }

    #[test]
    fn test_list_flags_map_to_request_args() {
        let cli = Cli::parse_from([
            "wnghub",
            "list",
            "-n",
            "12",
            "--repo",
            "a",
            "--repo",
            "b",
            "--exclude-reason",
            "subscribed",
            "--all",
            "--no-prs",
            "--since",
            "2024-01-31T09:00:00Z",
        ]);
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list command");
        };
        let req = args.to_request_args();

        assert_eq!(req.num_results, Some(12));
        assert_eq!(req.include_repos, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(req.exclude_reasons, Some(vec!["subscribed".to_string()]));
        assert_eq!(req.all, Some(true));
        assert_eq!(req.show_prs, Some(false));
        assert!(req.show_issues.is_none());
        assert_eq!(
            req.since.map(|s| s.to_rfc3339()),
            Some("2024-01-31T09:00:00+00:00".to_string())
        );
    }

    fn list_args(argv: &[&str]) -> ListArgs {
        let cli = Cli::parse_from(argv);
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list command");
        };
        args
    }

    #[test]
    fn test_flag_pairs_can_override_config_both_ways() {
        let req = list_args(&["wnghub", "list", "--unread", "--prs", "--issues"])
            .to_request_args();
        assert_eq!(req.all, Some(false));
        assert_eq!(req.show_prs, Some(true));
        assert_eq!(req.show_issues, Some(true));

        let req = list_args(&["wnghub", "list", "--no-participating"]).to_request_args();
        assert_eq!(req.participating, Some(false));
    }

    #[test]
    fn test_last_flag_of_a_pair_wins() {
        let req = list_args(&["wnghub", "list", "--no-prs", "--prs"]).to_request_args();
        assert_eq!(req.show_prs, Some(true));

        let req = list_args(&["wnghub", "list", "--unread", "-a"]).to_request_args();
        assert_eq!(req.all, Some(true));
    }

    #[test]
    fn test_flag_beats_config_after_reconcile() {
        let config = Config {
            include_prs: Some(false),
            show_read_results: Some(true),
            ..Default::default()
        };
        let args = list_args(&["wnghub", "list", "--prs", "--unread"]).to_request_args();

        let req = RetrievalRequest::reconcile(args, &config, Utc::now());

        assert!(req.show_prs);
        assert!(!req.all);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        assert!(Cli::try_parse_from(["wnghub", "list", "--since", "last week"]).is_err());
    }
}
