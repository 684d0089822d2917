// Error types shared by the library modules. The binary and the router
// wrap these in `anyhow` with context, like the rest of the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server refused the request with a human readable message.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 401: the session token is missing, unknown or revoked.
    #[error("{message}")]
    Unauthorized { message: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Could not reach the server.")]
    Transport(#[source] reqwest::Error),

    /// 2xx answer whose body does not match the expected shape.
    #[error("Unexpected response from the server.")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text to show the user for this error.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Failure reading or writing the persisted session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access session file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is corrupt")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
