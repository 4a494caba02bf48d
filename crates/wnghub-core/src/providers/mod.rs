// Notification source implementations
pub mod github;

pub use github::GitHubNotifications;
