//! # Database module — PostgreSQL connection pool and migrations
//!
//! The pool is opened once by the binary from [`crate::settings::Database`] and
//! handed to [`crate::store::PgUserStore`] and the session store. Nothing here
//! keeps process-wide state.
//!
//! ## Re-exports
//!
//! - [`connect`] — opens a pool with the configured connection limit.
//! - [`migrate`] — applies the embedded `users` / `accounts` migrations.

mod pool;

pub use pool::{connect, migrate};
