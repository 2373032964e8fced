//! # brig
//!
//! Command-line client for the brig.gs URL shortener.
//!
//! Each invocation resolves settings (config file, `BRIG_*` environment,
//! flags), performs exactly one HTTP round trip and renders the outcome.
//!
//! Layers, innermost first:
//! - `domain`: short IDs, links, listings and argument validation
//! - `application`: the list/get/add/delete operations and their outcomes
//! - `infrastructure`: the HTTP transport and dependency wiring
//! - `cli`: argument parsing, dispatch and rendering

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
