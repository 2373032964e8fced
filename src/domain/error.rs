//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid arguments caught before any network call.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing short ID")]
    EmptyShortId,

    #[error("missing target URL")]
    EmptyTargetUrl,
}
