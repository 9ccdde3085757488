//! Credential and session token types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an issued session token.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// A registered account.
///
/// `password_hash` is a PHC-format string; the plaintext is never stored.
#[derive(Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// Manual Debug keeps the password hash out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Public profile fields returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            email: user.email.clone(),
        }
    }
}

/// Claims carried by a signed session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id the token is bound to.
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl TokenClaims {
    /// Claims for `user_id` issued at `now`, expiring after [`TOKEN_TTL_DAYS`].
    pub fn for_user(user_id: &Uuid, now: DateTime<Utc>) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        }
    }
}

/// Result of a successful signup.
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub user_id: Uuid,
    pub token: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_expire_after_seven_days() {
        let now = Utc::now();
        let claims = TokenClaims::for_user(&Uuid::now_v7(), now);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_user_debug_redacts_hash() {
        let user = User {
            id: Uuid::now_v7(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
        };
        let debug = format!("{user:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("a@x.com"));
    }

    #[test]
    fn test_public_user_serializes_camel_case() {
        let user = PublicUser {
            user_id: "abc".to_string(),
            email: "a@x.com".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["userId"], "abc");
    }
}
