//! # Auth crate — session identity resolution
//!
//! Everything the web server needs to sign users in with GitHub and resolve
//! their session on later requests.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`callbacks`] | Identity enrichment (`jwt`) and session projection (`session`) |
//! | [`settings`] | Layered [`Settings`] from defaults, `config.toml` and the environment |
//! | [`db`] | PostgreSQL pool and migrations |
//! | [`jwt`] | HS256 signing and verification of session tokens |
//! | [`models`] | `User`, `Token` and `Session` |
//! | [`providers`] | GitHub OAuth with PKCE |
//! | [`store`] | `UserStore` trait, Postgres and in-memory stores, sign-in adapter |
//!
//! ## Flow
//!
//! 1. The OAuth callback resolves the provider profile to a [`User`] with
//!    [`store::sign_in`] and mints a [`Token`] for it.
//! 2. Every token issue or refresh goes through [`Callbacks::jwt`], which
//!    rebuilds the claims from the user store.
//! 3. Every session read builds a default [`Session`] from the token and runs
//!    [`Callbacks::session`] to copy id, email, role and picture onto it.

pub mod callbacks;
pub mod settings;
pub mod db;
pub mod error;
pub mod jwt;
pub mod models;
pub mod providers;
pub mod store;

pub use callbacks::{Callbacks, IdentityCallbacks};
pub use settings::{Settings, UserLookup};
pub use error::{AuthError, Result};
pub use models::{Session, SessionUser, Token, User, UserRole};

/// Session key holding the signed token.
pub const SESSION_TOKEN_KEY: &str = "session_token";
