//! Claims carried in the signed session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{User, UserRole};

/// The recognised token claims. Only the identity enrichment callback
/// produces a fully populated token; tokens minted at sign-in carry just
/// the profile and `sub`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Stable subject identifier, the user id at sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl Token {
    /// Token minted right after a successful sign-in, before enrichment.
    pub fn for_sign_in(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: Some(user.email.clone()),
            picture: user.image.clone(),
            sub: Some(user.id.clone()),
            ..Self::default()
        }
    }
}
