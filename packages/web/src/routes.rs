//! Handlers for the `/api/auth/*` routes.

use std::collections::BTreeMap;

use auth::providers::{
    GitHubProvider, ProviderInfo, SESSION_OAUTH_STATE_KEY, SESSION_PKCE_VERIFIER_KEY,
};
use auth::{store, Token};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::WebError;
use crate::session::{store_token, AuthSession};
use crate::AppState;

/// `GET /api/auth/providers`
pub async fn providers(State(state): State<AppState>) -> Json<BTreeMap<&'static str, ProviderInfo>> {
    Json(BTreeMap::from([(GitHubProvider::ID, state.github.info())]))
}

/// `GET /api/auth/signin/github`
pub async fn github_signin(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, WebError> {
    let request = state.github.authorization_url();
    session
        .insert(SESSION_OAUTH_STATE_KEY, request.csrf_state)
        .await?;
    session
        .insert(SESSION_PKCE_VERIFIER_KEY, request.pkce_verifier)
        .await?;
    Ok(Redirect::to(&request.url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// `GET /api/auth/callback/github`
pub async fn github_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    match complete_github_sign_in(&state, &session, params).await {
        Ok(user_id) => {
            tracing::info!(%user_id, "signed in with GitHub");
            Redirect::to("/")
        }
        Err(e) => {
            tracing::error!(error = %e, "GitHub sign-in failed");
            Redirect::to(&format!("/api/auth/error?error={}", e.code()))
        }
    }
}

async fn complete_github_sign_in(
    state: &AppState,
    session: &Session,
    params: CallbackParams,
) -> Result<String, WebError> {
    if let Some(error) = params.error {
        return Err(WebError::ProviderDenied(error));
    }
    let code = params.code.ok_or(WebError::MissingParam("code"))?;
    let returned_state = params.state.ok_or(WebError::MissingParam("state"))?;

    let expected_state: Option<String> = session.remove(SESSION_OAUTH_STATE_KEY).await?;
    let verifier: Option<String> = session.remove(SESSION_PKCE_VERIFIER_KEY).await?;
    if expected_state.as_deref() != Some(returned_state.as_str()) {
        return Err(WebError::InvalidState);
    }
    let verifier = verifier.ok_or(WebError::InvalidState)?;

    let profile = state.github.exchange_code(&code, &verifier).await?;
    let user = store::sign_in(state.store.as_ref(), GitHubProvider::ID, profile).await?;
    let token = state.callbacks.jwt(Token::for_sign_in(&user)).await?;

    session.cycle_id().await?;
    store_token(state, session, &token).await?;
    Ok(user.id)
}

/// `GET /api/auth/session`
pub async fn session(AuthSession(session): AuthSession) -> Json<Option<auth::Session>> {
    Json(session)
}

/// `POST /api/auth/signout`
pub async fn signout(session: Session) -> Result<Redirect, WebError> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct ErrorParams {
    error: Option<String>,
}

/// `GET /api/auth/error`
pub async fn error(Query(params): Query<ErrorParams>) -> impl IntoResponse {
    let error = params.error.unwrap_or_else(|| "Default".to_string());
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": error })),
    )
}
