//! Auth service: signup, login, and token verification.

use chrono::Utc;
use dnya_types::error::{AuthError, RepositoryError};
use dnya_types::user::{LoginOutcome, PublicUser, SignupOutcome, TokenClaims, User};
use uuid::Uuid;

use super::credentials::{PasswordHasher, TokenIssuer};
use super::repository::UserRepository;

/// Verified against when a login names an unknown email, so both failure
/// branches cost one hash verification.
const DUMMY_PASSWORD: &str = "dnya-unknown-account";

pub struct AuthService<U: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    users: U,
    hasher: H,
    tokens: T,
    dummy_hash: String,
}

impl<U: UserRepository, H: PasswordHasher, T: TokenIssuer> AuthService<U, H, T> {
    pub fn new(users: U, hasher: H, tokens: T) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            users,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    /// Register a new account and issue its first token.
    pub async fn signup(&self, email: &str, password: &str) -> Result<SignupOutcome, AuthError> {
        let (email, password) = validate(email, password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let user = User {
            id: Uuid::now_v7(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            created_at: Utc::now(),
        };
        self.users.create_user(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::Conflict,
            other => AuthError::Storage(other),
        })?;

        let token = self.tokens.issue(&TokenClaims::for_user(&user.id, Utc::now()))?;
        tracing::info!(user_id = %user.id, "account created");

        Ok(SignupOutcome {
            user_id: user.id,
            token,
        })
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let (email, password) = validate(email, password)?;

        let Some(user) = self.users.find_by_email(email).await? else {
            let _ = self.hasher.verify(password, &self.dummy_hash);
            return Err(AuthError::InvalidCredentials);
        };
        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&TokenClaims::for_user(&user.id, Utc::now()))?;
        tracing::debug!(user_id = %user.id, "login succeeded");

        Ok(LoginOutcome {
            token,
            user: PublicUser::from(&user),
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.tokens.verify(token)
    }

    /// Resolve a bearer token to the account it was issued for.
    pub async fn current_user(&self, token: &str) -> Result<PublicUser, AuthError> {
        let claims = self.verify_token(token)?;
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("malformed subject".to_string()))?;
        let user = self
            .users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("unknown subject".to_string()))?;
        Ok(PublicUser::from(&user))
    }
}

fn validate<'a>(email: &'a str, password: &'a str) -> Result<(&'a str, &'a str), AuthError> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() {
        return Err(AuthError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok((email, password))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default, Clone)]
    struct InMemoryUsers {
        users: Arc<parking_lot::Mutex<HashMap<String, User>>>,
    }

    impl UserRepository for InMemoryUsers {
        async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
            let mut users = self.users.lock();
            if users.contains_key(&user.email) {
                return Err(RepositoryError::Conflict(user.email.clone()));
            }
            users.insert(user.email.clone(), user.clone());
            Ok(())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.lock().get(email).cloned())
        }

        async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.lock().values().find(|u| &u.id == id).cloned())
        }
    }

    /// Reversible "hash" that counts verifications.
    #[derive(Default, Clone)]
    struct CountingHasher {
        verifications: Arc<AtomicUsize>,
    }

    impl PasswordHasher for CountingHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("plain${password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            hash.strip_prefix("plain$") == Some(password)
        }
    }

    struct FakeTokens;

    impl TokenIssuer for FakeTokens {
        fn issue(&self, claims: &TokenClaims) -> Result<String, AuthError> {
            Ok(format!("{}.{}.{}", claims.sub, claims.iat, claims.exp))
        }

        fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
            let parts: Vec<&str> = token.split('.').collect();
            match parts.as_slice() {
                [sub, iat, exp] => Ok(TokenClaims {
                    sub: sub.to_string(),
                    iat: iat.parse().map_err(|_| AuthError::InvalidToken("iat".into()))?,
                    exp: exp.parse().map_err(|_| AuthError::InvalidToken("exp".into()))?,
                }),
                _ => Err(AuthError::InvalidToken("malformed".to_string())),
            }
        }
    }

    fn service() -> (
        AuthService<InMemoryUsers, CountingHasher, FakeTokens>,
        InMemoryUsers,
        CountingHasher,
    ) {
        let users = InMemoryUsers::default();
        let hasher = CountingHasher::default();
        let svc = AuthService::new(users.clone(), hasher.clone(), FakeTokens).unwrap();
        (svc, users, hasher)
    }

    #[tokio::test]
    async fn test_signup_is_unique_per_email() {
        let (svc, users, _) = service();
        let first = svc.signup("a@x.com", "pw123456").await.unwrap();
        assert!(!first.token.is_empty());

        let err = svc.signup("a@x.com", "another").await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(users.users.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_stores_hash_not_password() {
        let (svc, users, _) = service();
        svc.signup("a@x.com", "pw123456").await.unwrap();
        let stored = users.users.lock().get("a@x.com").cloned().unwrap();
        assert_ne!(stored.password_hash, "pw123456");
    }

    #[tokio::test]
    async fn test_signup_rejects_blank_fields() {
        let (svc, _, _) = service();
        assert!(matches!(
            svc.signup("  ", "pw").await.unwrap_err(),
            AuthError::Validation(_)
        ));
        assert!(matches!(
            svc.signup("a@x.com", "").await.unwrap_err(),
            AuthError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_login_token_decodes_to_user_id() {
        let (svc, _, _) = service();
        let signup = svc.signup("a@x.com", "pw123456").await.unwrap();

        let login = svc.login("a@x.com", "pw123456").await.unwrap();
        assert_eq!(login.user.user_id, signup.user_id.to_string());
        assert_eq!(login.user.email, "a@x.com");

        let claims = svc.verify_token(&login.token).unwrap();
        assert_eq!(claims.sub, signup.user_id.to_string());
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (svc, _, hasher) = service();
        svc.signup("a@x.com", "pw123456").await.unwrap();

        let before = hasher.verifications.load(Ordering::SeqCst);
        let unknown = svc.login("nobody@x.com", "pw123456").await.unwrap_err();
        let wrong = svc.login("a@x.com", "wrong").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(hasher.verifications.load(Ordering::SeqCst) - before, 2);
    }

    #[tokio::test]
    async fn test_current_user_resolves_token() {
        let (svc, _, _) = service();
        let signup = svc.signup("a@x.com", "pw123456").await.unwrap();

        let user = svc.current_user(&signup.token).await.unwrap();
        assert_eq!(user.email, "a@x.com");

        let err = svc.current_user("garbage").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
