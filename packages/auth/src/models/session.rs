//! Client-facing session shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Token, UserRole};

/// Session returned to clients. Derived from the token on every request and
/// never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

/// The `user` part of a [`Session`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl Session {
    /// Default session built from the token's profile claims, before the
    /// session callback runs.
    pub fn from_token(token: &Token, expires: DateTime<Utc>) -> Self {
        Self {
            user: SessionUser {
                name: token.name.clone(),
                email: token.email.clone(),
                image: token.picture.clone(),
                ..SessionUser::default()
            },
            expires,
        }
    }
}
