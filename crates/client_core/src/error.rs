use shared::error::ApiError;
use thiserror::Error;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed: DNS, refused connection, timeout, or a
    /// body that could not be read.
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    #[error(transparent)]
    Http(#[from] ApiError),
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("request cancelled")]
    Cancelled,
    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("invalid api url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ClientError {
    /// The service could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// The service answered with a non-success status.
    pub fn is_http(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http(err) => Some(err.status),
            _ => None,
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Http(err) => Some(err),
            _ => None,
        }
    }
}
