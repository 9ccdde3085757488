//! Chat profile and consent records.

use std::sync::Arc;

use dnya_types::chat::ChatUser;
use dnya_types::error::RepositoryError;

use super::repository::ChatUserRepository;

pub struct ChatProfileService<R: ChatUserRepository> {
    repo: Arc<R>,
}

impl<R: ChatUserRepository> ChatProfileService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Return the profile for `user_id`, creating it when absent.
    ///
    /// `email` is only stored on creation.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        email: Option<String>,
    ) -> Result<ChatUser, RepositoryError> {
        if let Some(existing) = self.repo.find_chat_user(user_id).await? {
            return Ok(existing);
        }
        let user = self.repo.insert_if_absent(&ChatUser::new(user_id, email)).await?;
        tracing::debug!(user_id, "chat profile created");
        Ok(user)
    }

    pub async fn set_consent(
        &self,
        user_id: &str,
        has_consented: Option<bool>,
    ) -> Result<ChatUser, RepositoryError> {
        let user = self.repo.upsert_consent(user_id, has_consented).await?;
        tracing::info!(user_id, has_consented = user.has_consented, "consent updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct InMemoryChatUsers {
        users: parking_lot::Mutex<HashMap<String, ChatUser>>,
    }

    impl ChatUserRepository for InMemoryChatUsers {
        async fn find_chat_user(&self, user_id: &str) -> Result<Option<ChatUser>, RepositoryError> {
            Ok(self.users.lock().get(user_id).cloned())
        }

        async fn insert_if_absent(&self, user: &ChatUser) -> Result<ChatUser, RepositoryError> {
            Ok(self
                .users
                .lock()
                .entry(user.user_id.clone())
                .or_insert_with(|| user.clone())
                .clone())
        }

        async fn upsert_consent(
            &self,
            user_id: &str,
            has_consented: Option<bool>,
        ) -> Result<ChatUser, RepositoryError> {
            let mut users = self.users.lock();
            let user = users
                .entry(user_id.to_string())
                .or_insert_with(|| ChatUser::new(user_id, None));
            if let Some(flag) = has_consented {
                user.has_consented = flag;
            }
            Ok(user.clone())
        }
    }

    fn service() -> ChatProfileService<InMemoryChatUsers> {
        ChatProfileService::new(Arc::new(InMemoryChatUsers::default()))
    }

    #[tokio::test]
    async fn test_get_or_create_keeps_first_record() {
        let svc = service();
        let first = svc
            .get_or_create("u1", Some("a@x.com".to_string()))
            .await
            .unwrap();
        let second = svc
            .get_or_create("u1", Some("other@x.com".to_string()))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.email.as_deref(), Some("a@x.com"));
        assert!(!second.has_consented);
    }

    #[tokio::test]
    async fn test_set_consent_upserts() {
        let svc = service();
        let user = svc.set_consent("u2", Some(true)).await.unwrap();
        assert!(user.has_consented);

        let unchanged = svc.set_consent("u2", None).await.unwrap();
        assert!(unchanged.has_consented);

        let fresh = svc.set_consent("u3", None).await.unwrap();
        assert!(!fresh.has_consented);
    }
}
