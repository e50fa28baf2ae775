//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`RemoteError`] returned by a [`TodoRemote`] when a call does not
//!   complete with a 2xx response.
//! - [`ValidationError`] raised locally, before any request is sent.
//! - [`SyncError`] returned by the [`Controller`] and wrapping both.
//!
//!  [`TodoRemote`]: crate::TodoRemote
//!  [`Controller`]: crate::Controller
use std::time::Duration;

use thiserror::Error;

/// Failure of a single remote call. Never retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("server not reachable: {0}")]
    NetworkUnavailable(String),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("{status}: {message}")]
    ServerRejected { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

impl RemoteError {
    /// HTTP status of the failure, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Client-side validation failure. The request is never sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title is {len} characters long, at most {max} are allowed")]
    TitleTooLong { len: usize, max: usize },
    #[error("invalid due date \"{0}\"")]
    InvalidDueDate(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
