//! # User store
//!
//! [`UserStore`] is the seam between the auth flow and wherever user rows
//! live. Two implementations ship with the crate:
//!
//! - [`PgUserStore`] — the `users` / `accounts` tables in PostgreSQL.
//! - [`MemoryUserStore`] — an in-process store for tests and local runs.
//!
//! [`sign_in`] is the adapter logic run after a successful OAuth exchange: it
//! resolves the provider account to a user, creating and linking one on the
//! first visit. Emails are compared case-insensitively and stored lowercased.

mod memory;
mod postgres;

use async_trait::async_trait;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use crate::error::{AuthError, Result};
use crate::models::{normalize_email, NewUser, User};
use crate::providers::OAuthProfile;

/// Persistence for user records and their linked provider accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// First user row in storage order, with no filter.
    async fn find_first_user(&self) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Case-insensitive lookup by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>>;

    /// Insert a user together with its first provider account. Either both
    /// rows are written or neither is.
    async fn create_user_with_account(
        &self,
        user: NewUser,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<User>;
}

/// Resolve an OAuth profile to a user, creating it on first sign-in.
///
/// A linked account returns its user as stored. An unknown account whose
/// email already belongs to a user fails with [`AuthError::AccountNotLinked`].
pub async fn sign_in(store: &dyn UserStore, provider: &str, profile: OAuthProfile) -> Result<User> {
    if let Some(user) = store
        .find_user_by_account(provider, &profile.provider_account_id)
        .await?
    {
        tracing::debug!(user_id = %user.id, provider, "account already linked");
        return Ok(user);
    }

    let email = normalize_email(&profile.email);
    if store.find_user_by_email(&email).await?.is_some() {
        tracing::warn!(provider, "email belongs to a user without this account");
        return Err(AuthError::AccountNotLinked { email });
    }

    let new_user = NewUser {
        name: profile.name,
        email,
        image: profile.image,
    };
    let user = store
        .create_user_with_account(new_user, provider, &profile.provider_account_id)
        .await?;
    tracing::info!(user_id = %user.id, provider, "created user");

    Ok(user)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    fn profile(account: &str, email: &str) -> OAuthProfile {
        OAuthProfile {
            provider_account_id: account.to_string(),
            name: Some("Octo Cat".to_string()),
            email: email.to_string(),
            image: Some("https://avatars.example/octo.png".to_string()),
        }
    }

    #[tokio::test]
    async fn test_first_sign_in_creates_and_links() {
        let store = MemoryUserStore::new();
        let user = sign_in(&store, "github", profile("42", "octo@example.com"))
            .await
            .unwrap();

        assert_eq!(user.email, "octo@example.com");
        assert_eq!(user.image.as_deref(), Some("https://avatars.example/octo.png"));
        let linked = store.find_user_by_account("github", "42").await.unwrap();
        assert_eq!(linked, Some(user));
    }

    #[tokio::test]
    async fn test_returning_account_keeps_stored_profile() {
        let store = MemoryUserStore::new();
        let first = sign_in(&store, "github", profile("42", "octo@example.com"))
            .await
            .unwrap();

        let mut changed = profile("42", "octo@example.com");
        changed.name = Some("Renamed".to_string());
        let again = sign_in(&store, "github", changed).await.unwrap();

        assert_eq!(again, first);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_email_owned_by_other_account_is_rejected() {
        let store = MemoryUserStore::new();
        sign_in(&store, "github", profile("42", "octo@example.com"))
            .await
            .unwrap();

        let err = sign_in(&store, "github", profile("43", "octo@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountNotLinked { .. }));
    }

    #[tokio::test]
    async fn test_email_match_ignores_case() {
        let store = MemoryUserStore::new();
        let user = sign_in(&store, "github", profile("42", "Octo@Example.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "octo@example.com");

        let err = sign_in(&store, "github", profile("43", "OCTO@example.COM"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountNotLinked { .. }));
        assert_eq!(store.len().await, 1);
    }

    /// Memory store whose next account creation fails once.
    #[derive(Default)]
    struct FailingOnceStore {
        inner: MemoryUserStore,
        failed: AtomicBool,
    }

    #[async_trait]
    impl UserStore for FailingOnceStore {
        async fn find_first_user(&self) -> Result<Option<User>> {
            self.inner.find_first_user().await
        }

        async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
            self.inner.find_user_by_id(id).await
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
            self.inner.find_user_by_email(email).await
        }

        async fn find_user_by_account(
            &self,
            provider: &str,
            provider_account_id: &str,
        ) -> Result<Option<User>> {
            self.inner
                .find_user_by_account(provider, provider_account_id)
                .await
        }

        async fn create_user_with_account(
            &self,
            user: NewUser,
            provider: &str,
            provider_account_id: &str,
        ) -> Result<User> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(AuthError::Database(sqlx::Error::PoolTimedOut));
            }
            self.inner
                .create_user_with_account(user, provider, provider_account_id)
                .await
        }
    }

    #[tokio::test]
    async fn test_failed_creation_can_be_retried() {
        let store = FailingOnceStore::default();
        let err = sign_in(&store, "github", profile("42", "octo@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Database(_)));
        assert!(store.inner.is_empty().await);

        let user = sign_in(&store, "github", profile("42", "octo@example.com"))
            .await
            .unwrap();
        let linked = store.find_user_by_account("github", "42").await.unwrap();
        assert_eq!(linked, Some(user));
    }
}
