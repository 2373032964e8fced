//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements the HTTP boundary trait and wires up services.

pub mod di;
pub mod traits;
