//! Process exit codes
//!
//! Success is the implicit 0 of a normal return from `main`.

/// Any failure: missing config, invalid argument, network error, unexpected HTTP status
pub const FAILURE: i32 = 1;
