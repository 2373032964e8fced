//! Application layer: services and use cases
//!
//! This layer turns operations into requests and responses into outcomes.
//! It depends on the I/O boundary traits, never on a concrete transport.

pub mod error;
pub mod outcome;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use outcome::{CommandOutcome, LinkStatus, ListResponse, Lookup};
