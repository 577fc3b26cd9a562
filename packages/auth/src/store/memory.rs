//! In-memory user store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserStore;
use crate::error::{AuthError, Result};
use crate::models::{normalize_email, NewUser, User};

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    provider: String,
    provider_account_id: String,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    accounts: Vec<Account>,
}

/// User store kept in process memory. Users keep insertion order, so
/// [`UserStore::find_first_user`] returns the oldest one.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with existing users.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: users.into_iter().collect(),
                accounts: Vec::new(),
            }),
        }
    }

    /// Insert or replace a user by id.
    pub async fn put_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        match inner.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => inner.users.push(user),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_first_user(&self) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.first().cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        let email = normalize_email(email);
        Ok(inner
            .users
            .iter()
            .find(|u| normalize_email(&u.email) == email)
            .cloned())
    }

    async fn find_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        let Some(account) = inner
            .accounts
            .iter()
            .find(|a| a.provider == provider && a.provider_account_id == provider_account_id)
        else {
            return Ok(None);
        };
        Ok(inner.users.iter().find(|u| u.id == account.user_id).cloned())
    }

    async fn create_user_with_account(
        &self,
        user: NewUser,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<User> {
        let user = User::from_new(user);
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|u| normalize_email(&u.email) == user.email) {
            return Err(AuthError::Conflict(format!("email {} is taken", user.email)));
        }
        if inner
            .accounts
            .iter()
            .any(|a| a.provider == provider && a.provider_account_id == provider_account_id)
        {
            return Err(AuthError::Conflict(format!(
                "{provider} account {provider_account_id} is already linked"
            )));
        }

        inner.users.push(user.clone());
        inner.accounts.push(Account {
            user_id: user.id.clone(),
            provider: provider.to_string(),
            provider_account_id: provider_account_id.to_string(),
        });
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: None,
            email: email.to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_conflicting_account_writes_nothing() {
        let store = MemoryUserStore::new();
        store
            .create_user_with_account(new_user("a@x.com"), "github", "42")
            .await
            .unwrap();

        let err = store
            .create_user_with_account(new_user("b@x.com"), "github", "42")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.find_user_by_email("b@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_email_is_unique_ignoring_case() {
        let store = MemoryUserStore::new();
        store
            .create_user_with_account(new_user("a@x.com"), "github", "42")
            .await
            .unwrap();

        let err = store
            .create_user_with_account(new_user("A@X.com"), "github", "43")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
        assert!(store.find_user_by_account("github", "43").await.unwrap().is_none());
    }
}
