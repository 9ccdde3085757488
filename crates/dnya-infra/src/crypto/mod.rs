//! Credential cryptography for Dnya.
//!
//! - `password`: Argon2id password hashing
//! - `token`: HS256 session tokens

pub mod password;
pub mod token;
