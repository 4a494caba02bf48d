use thiserror::Error;

/// All the ways a notification run can go wrong
///
/// Nothing in the core retries or swallows these. They travel up to the
/// CLI untouched, which decides on the message and exit code.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("GitHub returned status {status}: {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Failed to parse notifications page: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Notification has no thread id; cannot update its status")]
    ThreadIdMissing,

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<wnghub_api::GitHubError> for Error {
    fn from(err: wnghub_api::GitHubError) -> Self {
        use wnghub_api::GitHubError;

        match err {
            GitHubError::Unauthorized => {
                Error::AuthError("GitHub rejected the auth token (HTTP 401)".into())
            }
            GitHubError::InvalidToken(msg) => Error::AuthError(msg),
            GitHubError::RequestFailed { status, body } => Error::UpstreamError {
                status,
                message: body,
            },
            GitHubError::NetworkError(e) => Error::NetworkError(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}
