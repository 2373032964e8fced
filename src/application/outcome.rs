//! Typed result of one operation, derived from the HTTP status code.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{LinkListing, ShortId};

/// Outcome of one request/response cycle.
///
/// Network failures never reach this type; they are `ApplicationError::Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome<T> {
    Success(T),
    /// Only produced by lookups; carries the same payload so the miss can be rendered.
    NotFound(T),
    Unauthorized { body: String },
    ServerError { status: u16, body: String },
}

impl<T> CommandOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Collapse the outcome into a payload, turning HTTP-level failures into errors.
    ///
    /// `NotFound` is kept as a value: for lookups it is an answer, not a failure.
    pub fn into_result(self, context: &str) -> ApplicationResult<Lookup<T>> {
        match self {
            Self::Success(payload) => Ok(Lookup::Found(payload)),
            Self::NotFound(payload) => Ok(Lookup::Missing(payload)),
            Self::Unauthorized { body } => Err(ApplicationError::Protocol {
                context: format!("{context}: unauthorized, check the API token"),
                status: 401,
                body,
            }),
            Self::ServerError { status, body } => Err(ApplicationError::Protocol {
                context: context.to_string(),
                status,
                body,
            }),
        }
    }

    /// Like `into_result`, but a `NotFound` is an error too.
    pub fn into_success(self, context: &str) -> ApplicationResult<T> {
        match self.into_result(context)? {
            Lookup::Found(payload) => Ok(payload),
            Lookup::Missing(_) => Err(ApplicationError::Protocol {
                context: context.to_string(),
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Payload of a successful or missed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Missing(T),
}

/// Successful `GET /api/list`.
///
/// Keeps the raw body so JSON output is a byte-for-byte passthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    pub body: String,
}

impl ListResponse {
    /// Decode the body into a listing.
    pub fn listing(&self) -> ApplicationResult<LinkListing> {
        serde_json::from_str(&self.body).map_err(|source| ApplicationError::Decode {
            context: "error listing links".into(),
            source,
        })
    }
}

/// Result of `GET /{short_id}`, found or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub short_id: ShortId,
    pub request_url: String,
    pub status: u16,
    /// `Location` header of a redirect, never followed.
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_server_error_when_collapsing_then_returns_protocol_error() {
        let outcome: CommandOutcome<()> = CommandOutcome::ServerError {
            status: 500,
            body: "boom".into(),
        };
        let err = outcome.into_result("error deleting link").unwrap_err();
        assert_eq!(err.to_string(), "error deleting link (HTTP 500): boom");
    }

    #[test]
    fn given_unauthorized_when_collapsing_then_mentions_token() {
        let outcome: CommandOutcome<()> = CommandOutcome::Unauthorized {
            body: "bad token".into(),
        };
        let err = outcome.into_result("error listing links").unwrap_err();
        assert!(err.to_string().contains("API token"));
        assert!(err.to_string().contains("bad token"));
    }

    #[test]
    fn given_not_found_when_collapsing_then_keeps_payload() {
        let outcome = CommandOutcome::NotFound(7);
        assert_eq!(outcome.into_result("x").unwrap(), Lookup::Missing(7));
    }

    #[test]
    fn given_malformed_list_body_when_decoding_then_returns_decode_error() {
        let response = ListResponse {
            body: "not json".into(),
        };
        assert!(matches!(
            response.listing(),
            Err(ApplicationError::Decode { .. })
        ));
    }
}
