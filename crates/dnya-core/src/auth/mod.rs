//! Account signup, login and session token verification.
//!
//! The service is generic over its storage, hashing and token ports so
//! dnya-core never depends on dnya-infra.

pub mod credentials;
pub mod repository;
pub mod service;
