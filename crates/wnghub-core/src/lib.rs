// Notification retrieval, filtering and display
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod parser;
pub mod providers;
pub mod request;
pub mod retrieval;
pub mod view;

pub use config::Config;
pub use error::Error;
pub use filter::{
    AggregateFilter, NotificationFilter, OrgFilter, ReasonFilter, RepoFilter, TypeFilter,
};
pub use models::Notification;
pub use parser::parse_page;
pub use providers::GitHubNotifications;
pub use request::{RequestArgs, RetrievalRequest};
pub use retrieval::{MarkedRead, NotificationController, NotificationSource, Retrieval};
pub use view::{Column, Field, JsonRenderer, OutputFormat, Renderer, TableRenderer};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
