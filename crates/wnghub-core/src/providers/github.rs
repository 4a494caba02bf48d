// GitHub notification source - bridges the API client with NotificationSource
use async_trait::async_trait;
use wnghub_api::{GitHubClient, NotificationQuery};

use crate::{config::Config, retrieval::NotificationSource, Error, Result};

/// Wrapper around GitHubClient that implements NotificationSource
pub struct GitHubNotifications {
    client: GitHubClient,
}

impl GitHubNotifications {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Build from config. Fails with an auth error, before any request is
    /// made, when no token is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.auth_token().ok_or_else(|| {
            Error::AuthError("No auth token configured. Run `wnghub set-auth <TOKEN>` first.".into())
        })?;

        let client = match &config.api_url {
            Some(url) => GitHubClient::with_base_url(token, url.clone())?,
            None => GitHubClient::new(token)?,
        };

        Ok(Self::new(client))
    }
}

#[async_trait]
impl NotificationSource for GitHubNotifications {
    async fn list_notifications(&self, query: &NotificationQuery) -> Result<String> {
        Ok(self.client.list_notifications(query).await?)
    }

    async fn update_thread_status(&self, thread_id: &str) -> Result<()> {
        Ok(self.client.mark_thread_read(thread_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_token_is_auth_error() {
        let result = GitHubNotifications::from_config(&Config::default());
        assert!(matches!(result, Err(Error::AuthError(_))));
    }

    #[test]
    fn test_from_config_with_token() {
        let config = Config {
            auth_token: Some("ghp_test".into()),
            api_url: Some("https://ghe.example.com/api/v3".into()),
            ..Default::default()
        };
        assert!(GitHubNotifications::from_config(&config).is_ok());
    }
}
