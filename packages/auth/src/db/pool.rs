//! Database connection pool.

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::settings::Database;
use crate::error::{AuthError, Result};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open a connection pool for `database.url`.
pub async fn connect(database: &Database) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .connect(&database.url)
        .await?;
    Ok(pool)
}

/// Run pending migrations for the user tables.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AuthError::Database(e.into()))
}
