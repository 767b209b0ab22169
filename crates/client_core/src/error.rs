//! Failure taxonomy for clock-service operations.

use std::fmt;

use thiserror::Error;

/// A single remote call that did not produce a usable response.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request url for {endpoint}: {source}")]
    Url {
        endpoint: &'static str,
        source: url::ParseError,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    /// Raised by [`ClockService`](crate::ClockService) implementations that do
    /// not speak HTTP when their backend cannot serve the call.
    /// `HttpClockService` never produces it.
    #[error("clock service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTarget {
    Processes,
    Events,
}

impl RefreshTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshTarget::Processes => "processes",
            RefreshTarget::Events => "events",
        }
    }
}

impl fmt::Display for RefreshTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a user-initiated operation that did not complete.
///
/// Every variant has already been surfaced through the notification center by
/// the time the caller sees it.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("validation failed: {0}")]
    Validation(&'static str),
    #[error("remote operation failed: {0}")]
    Remote(#[source] ServiceError),
    #[error("refresh of {target} failed: {source}")]
    Fetch {
        target: RefreshTarget,
        #[source]
        source: ServiceError,
    },
}

impl OperationError {
    pub fn is_validation(&self) -> bool {
        matches!(self, OperationError::Validation(_))
    }
}
