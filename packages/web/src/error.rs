//! Errors raised by the HTTP handlers.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("session layer is missing: {0}")]
    SessionLayer(&'static str),

    #[error("provider returned an error: {0}")]
    ProviderDenied(String),

    #[error("callback is missing `{0}`")]
    MissingParam(&'static str),

    #[error("OAuth state does not match")]
    InvalidState,
}

impl WebError {
    /// Short error code passed to `/api/auth/error`.
    pub fn code(&self) -> &'static str {
        match self {
            WebError::Auth(AuthError::AccountNotLinked { .. }) => "OAuthAccountNotLinked",
            WebError::Auth(AuthError::OAuth(_))
            | WebError::ProviderDenied(_)
            | WebError::MissingParam(_)
            | WebError::InvalidState => "OAuthCallback",
            WebError::Auth(AuthError::IdentityResolution)
            | WebError::Auth(AuthError::Database(_))
            | WebError::Auth(AuthError::Conflict(_))
            | WebError::Auth(AuthError::Jwt(_)) => "Callback",
            WebError::Auth(AuthError::Config(_))
            | WebError::Session(_)
            | WebError::SessionLayer(_) => "Configuration",
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = Json(serde_json::json!({ "error": self.code() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
