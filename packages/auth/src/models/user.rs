//! # User record
//!
//! [`User`] is the canonical identity row from the `users` table. The identity
//! callbacks only ever read it; rows are created by the sign-in adapter the
//! first time an OAuth account is seen.
//!
//! - `id` — text primary key (a UUID v4 for users created here).
//! - `email`, `name`, `image` — profile fields copied from the provider at
//!   account creation.
//! - `email_verified` — set when the address has been confirmed, `NULL` for
//!   OAuth sign-ups.
//! - `role` — [`UserRole`], stored in the `user_role` Postgres enum.
//!
//! [`NewUser`] is the subset handed to
//! [`crate::store::UserStore::create_user_with_account`]. Emails are kept in
//! the form returned by [`normalize_email`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Authorization role attached to every user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Full user record from the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub role: UserRole,
}

/// Profile used to create a user on first sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

impl User {
    /// Build a fresh record for `new`, with a random id and the default role.
    pub fn from_new(new: NewUser) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            email: normalize_email(&new.email),
            email_verified: None,
            image: new.image,
            role: UserRole::default(),
        }
    }
}

/// Canonical form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
