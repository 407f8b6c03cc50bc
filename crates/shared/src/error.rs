use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Non-success HTTP response from the oversight API.
///
/// `details` holds whatever JSON the server returned; bodies that fail to
/// decode are replaced with an empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("API Error: {status}")]
pub struct ApiError {
    pub status: u16,
    pub details: Value,
}

impl ApiError {
    pub fn new(status: u16, details: Value) -> Self {
        Self { status, details }
    }

    /// Builds the error from a raw response body, falling back to `{}`.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let details =
            serde_json::from_slice::<Value>(body).unwrap_or_else(|_| Value::Object(Map::new()));
        Self { status, details }
    }

    /// Human readable message, when the body carries one under `detail` or `message`.
    pub fn message(&self) -> Option<&str> {
        ["detail", "message", "error"]
            .iter()
            .find_map(|key| self.details.get(*key).and_then(Value::as_str))
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}
