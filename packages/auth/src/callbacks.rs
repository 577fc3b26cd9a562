//! # Identity callbacks
//!
//! The two hooks run by the session flow:
//!
//! - **`jwt`** — called whenever a token is issued (sign-in) or refreshed
//!   (every session read). [`IdentityCallbacks`] reloads the canonical user
//!   record and rebuilds the token from it, so role changes reach clients on
//!   the next refresh.
//! - **`session`** — called when a client-facing [`Session`] is built from a
//!   token. It copies `id`, `email`, `role` and `picture` (as `image`) onto
//!   `session.user`.
//!
//! The user store is injected, never looked up globally, so tests can hand in
//! a [`crate::store::MemoryUserStore`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::settings::UserLookup;
use crate::error::{AuthError, Result};
use crate::models::{Session, Token, User};
use crate::store::UserStore;

/// Extension points invoked while issuing tokens and building sessions.
#[async_trait]
pub trait Callbacks: Send + Sync {
    /// Produce the token to sign from the incoming one.
    async fn jwt(&self, token: Token) -> Result<Token>;

    /// Shape the session handed to the client.
    fn session(&self, session: Session, token: Option<&Token>) -> Session;
}

/// Callbacks that rebuild tokens from the user store.
#[derive(Clone)]
pub struct IdentityCallbacks {
    store: Arc<dyn UserStore>,
    lookup: UserLookup,
}

impl IdentityCallbacks {
    pub fn new(store: Arc<dyn UserStore>, lookup: UserLookup) -> Self {
        Self { store, lookup }
    }

    async fn find_user(&self, token: &Token) -> Result<Option<User>> {
        match self.lookup {
            UserLookup::Subject => match token.sub.as_deref() {
                Some(sub) => self.store.find_user_by_id(sub).await,
                None => Ok(None),
            },
            UserLookup::First => self.store.find_first_user().await,
        }
    }

    /// Rebuild `token` from the current user record. Fails with
    /// [`AuthError::IdentityResolution`] when no record matches; nothing from
    /// the incoming token but `sub` is carried over.
    pub async fn enrich(&self, token: Token) -> Result<Token> {
        tracing::debug!(sub = ?token.sub, lookup = ?self.lookup, "resolving token identity");

        let Some(user) = self.find_user(&token).await? else {
            tracing::warn!(sub = ?token.sub, "no user found for token");
            return Err(AuthError::IdentityResolution);
        };

        Ok(Token {
            id: Some(user.id),
            name: user.name,
            email: Some(user.email),
            email_verified: user.email_verified,
            role: Some(user.role),
            picture: user.image,
            sub: token.sub,
        })
    }
}

/// Copy the identity claims of `token` onto `session.user`. Without a token
/// the session is returned unchanged.
pub fn project(mut session: Session, token: Option<&Token>) -> Session {
    if let Some(token) = token {
        session.user.id = token.id.clone();
        session.user.email = token.email.clone();
        session.user.role = token.role;
        session.user.image = token.picture.clone();
    }
    session
}

#[async_trait]
impl Callbacks for IdentityCallbacks {
    async fn jwt(&self, token: Token) -> Result<Token> {
        self.enrich(token).await
    }

    fn session(&self, session: Session, token: Option<&Token>) -> Session {
        project(session, token)
    }
}
