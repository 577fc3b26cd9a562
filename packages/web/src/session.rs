//! # Server-side session resolution
//!
//! [`server_auth_session`] turns the signed token kept in the visitor's
//! session into the client-facing [`auth::Session`]:
//!
//! 1. read and verify the token (a bad signature or expired token counts as
//!    signed out),
//! 2. refresh it through [`auth::Callbacks::jwt`] and store the re-signed
//!    token,
//! 3. build the default session and run [`auth::Callbacks::session`].
//!
//! When the user behind the token no longer resolves, the session is flushed
//! and the visitor is signed out. [`AuthSession`] exposes the same thing as
//! an extractor for handlers.

use auth::{jwt, AuthError, Token, SESSION_TOKEN_KEY};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use tower_sessions::Session;

use crate::error::WebError;
use crate::AppState;

/// Sign `token` and store it in the visitor's session.
pub async fn store_token(state: &AppState, session: &Session, token: &Token) -> Result<(), WebError> {
    let raw = jwt::encode_token(token, &state.settings.auth.secret, state.settings.session_max_age())?;
    session.insert(SESSION_TOKEN_KEY, raw).await?;
    Ok(())
}

/// Resolve the current visitor's session, `None` when signed out.
pub async fn server_auth_session(
    state: &AppState,
    session: &Session,
) -> Result<Option<auth::Session>, WebError> {
    let Some(raw) = session.get::<String>(SESSION_TOKEN_KEY).await? else {
        return Ok(None);
    };

    let token = match jwt::decode_token(&raw, &state.settings.auth.secret) {
        Ok(token) => token,
        Err(e) => {
            tracing::debug!(error = %e, "discarding unreadable session token");
            session.flush().await?;
            return Ok(None);
        }
    };

    let token = match state.callbacks.jwt(token).await {
        Ok(token) => token,
        Err(AuthError::IdentityResolution) => {
            tracing::warn!("session user no longer resolves, signing out");
            session.flush().await?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    store_token(state, session, &token).await?;

    let expires = Utc::now()
        .checked_add_signed(state.settings.session_max_age())
        .ok_or_else(|| AuthError::Config("session expiry is out of range".into()))?;
    let default_session = auth::Session::from_token(&token, expires);
    Ok(Some(state.callbacks.session(default_session, Some(&token))))
}

/// Extractor resolving the current session for a handler.
pub struct AuthSession(pub Option<auth::Session>);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| WebError::SessionLayer(message))?;
        Ok(AuthSession(server_auth_session(state, &session).await?))
    }
}
