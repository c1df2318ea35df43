//! Error taxonomy for the calculation client.
//!
//! Raw transport errors never reach callers directly: everything that
//! happens after validation is folded into `CalculationFailed` with the
//! original cause attached, so the caller can decide between surfacing the
//! failure and degrading to the local estimate.

use thiserror::Error;

use offcut_types::InputError;

/// Why a calculation request failed after validation passed.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("invalid response payload: {0}")]
    InvalidPayload(InputError),
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Local validation failure - the request was never sent.
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    /// The endpoint was unreachable, unhappy, or unintelligible.
    #[error("waste calculation failed: {cause}")]
    CalculationFailed { cause: FailureCause },
}

impl ClientError {
    pub(crate) fn failed(cause: impl Into<FailureCause>) -> Self {
        ClientError::CalculationFailed {
            cause: cause.into(),
        }
    }

    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ClientError::InvalidInput(_))
    }
}

/// Construction-time failures, separate from per-request errors.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid server base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
