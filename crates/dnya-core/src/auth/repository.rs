//! UserRepository trait definition.

use dnya_types::error::RepositoryError;
use dnya_types::user::User;
use uuid::Uuid;

/// Persistence for registered accounts.
///
/// Implementations live in dnya-infra (e.g., `SqliteUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Insert a new account. A duplicate email yields
    /// [`RepositoryError::Conflict`], including when a concurrent insert wins.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
