//! Data models for users, tokens and sessions.

mod session;
mod token;
mod user;

pub use session::{Session, SessionUser};
pub use token::Token;
pub use user::{normalize_email, NewUser, User, UserRole};
