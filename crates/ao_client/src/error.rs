use std::io;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from talking to the simulation service or touching local files.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx answer. `detail` is the service's `detail` field when present,
    /// otherwise the endpoint's fallback message.
    #[error("{detail} (HTTP {status})")]
    Service { status: StatusCode, detail: String },
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not decode service response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn transport(context: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ClientError::Transport { context, source }
    }

    /// Map an I/O failure on `path` into [`ClientError::Io`].
    pub fn io(path: impl AsRef<std::path::Path>) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().display().to_string();
        move |source| ClientError::Io { path, source }
    }

    /// HTTP status for service errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Service { status, .. } => Some(*status),
            ClientError::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// True for request-validation rejections (HTTP 422).
    pub fn is_validation(&self) -> bool {
        self.status() == Some(StatusCode::UNPROCESSABLE_ENTITY)
    }

    /// The service's explanation, if this is a service error.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Service { detail, .. } => Some(detail.as_str()),
            _ => None,
        }
    }
}
