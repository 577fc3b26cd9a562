//! Error type shared by every step of the sign-in and session flow.

use thiserror::Error;

/// Errors surfaced by the auth crate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No canonical user could be found while enriching a token. Fatal for the
    /// current sign-in or refresh: no token is issued.
    #[error("unable to find user")]
    IdentityResolution,

    /// An OAuth account's email already belongs to a user signed in with
    /// another account.
    #[error("account is not linked to the user owning {email}")]
    AccountNotLinked { email: String },

    /// A write collided with an existing user or account.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("invalid session token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Config(err.to_string())
    }
}

pub type Result<T, E = AuthError> = std::result::Result<T, E>;
