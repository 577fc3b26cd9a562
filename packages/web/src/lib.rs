//! # Web crate — HTTP surface of the auth flow
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/auth/providers` | [`routes::providers`] |
//! | `GET /api/auth/signin/github` | [`routes::github_signin`] |
//! | `GET /api/auth/callback/github` | [`routes::github_callback`] |
//! | `GET /api/auth/session` | [`routes::session`] |
//! | `POST /api/auth/signout` | [`routes::signout`] |
//! | `GET /api/auth/error` | [`routes::error`] |
//!
//! [`router`] expects a `tower_sessions::SessionManagerLayer` to be added by
//! the caller.

use std::sync::Arc;

use auth::providers::GitHubProvider;
use auth::store::UserStore;
use auth::{Callbacks, IdentityCallbacks, Settings};
use axum::routing::{get, post};
use axum::Router;

pub mod error;
pub mod routes;
pub mod session;

pub use session::{server_auth_session, AuthSession};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn UserStore>,
    pub callbacks: Arc<dyn Callbacks>,
    pub github: Arc<GitHubProvider>,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<dyn UserStore>) -> auth::Result<Self> {
        let github = GitHubProvider::new(&settings)?;
        let callbacks = IdentityCallbacks::new(store.clone(), settings.auth.user_lookup);

        Ok(Self {
            settings: Arc::new(settings),
            store,
            callbacks: Arc::new(callbacks),
            github: Arc::new(github),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/providers", get(routes::providers))
        .route("/api/auth/signin/github", get(routes::github_signin))
        .route("/api/auth/callback/github", get(routes::github_callback))
        .route("/api/auth/session", get(routes::session))
        .route("/api/auth/signout", post(routes::signout))
        .route("/api/auth/error", get(routes::error))
        .with_state(state)
}
