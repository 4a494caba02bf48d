// Raw GitHub transport: wire types and the HTTP client
pub mod github;
pub mod notifications;

// Re-export common types
pub use github::{GitHubClient, GitHubError};
pub use notifications::{
    NotificationQuery, NotificationThread, ThreadOwner, ThreadRepository, ThreadSubject,
    MAX_PER_PAGE,
};
