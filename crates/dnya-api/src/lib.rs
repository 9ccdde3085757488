//! Dnya REST API: application state and the HTTP layer.
//!
//! The `dnya` binary wraps this with the CLI.

pub mod http;
pub mod state;
