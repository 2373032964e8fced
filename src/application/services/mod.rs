//! Application services
//!
//! Services depend on I/O boundary traits (HttpTransport) but are themselves
//! concrete structs, not traits.

mod links;

pub use links::LinkService;
