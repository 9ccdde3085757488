//! HTTP/REST API layer for Dnya.
//!
//! Axum-based REST API under `/api/` with bearer-token authentication for
//! account routes, bare JSON bodies, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
