//! Password hashing and session token ports.
//!
//! Both are synchronous, like the other CPU-bound service traits.

use dnya_types::error::AuthError;
use dnya_types::user::TokenClaims;

/// One-way password hashing with a per-hash salt.
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` into a self-describing string (e.g., PHC format).
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Whether `password` matches `hash`. Malformed hashes count as a mismatch.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Signs and validates session tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, claims: &TokenClaims) -> Result<String, AuthError>;

    /// Check signature and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
