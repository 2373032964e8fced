//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::traits::TransportError;

/// Application errors wrap domain errors and add request-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Missing or invalid argument, caught before any network call.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Missing token/base URL, unreadable config file, bad base URL.
    #[error("{message}")]
    Config { message: String },

    /// The round trip itself failed; no HTTP status is available.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: TransportError,
    },

    /// The service answered with a status the operation does not accept.
    #[error("{context} (HTTP {status}): {body}")]
    Protocol {
        context: String,
        status: u16,
        body: String,
    },

    /// The request body could not be serialized.
    #[error("{context}: cannot encode request: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A success response carried malformed JSON.
    #[error("{context}: invalid JSON in response: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApplicationError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
