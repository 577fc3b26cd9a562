use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use auth::store::PgUserStore;
use auth::Settings;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    // Initialize database pool
    let pool = auth::db::connect(&settings.database)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    auth::db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;

    // Create session store
    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("Failed to migrate session store")?;

    let max_age = Duration::from_secs(settings.session_max_age().num_seconds().unsigned_abs());
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(settings.auth.url.starts_with("https://"))
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(max_age.try_into()?));

    let address = settings.server.address.clone();
    let state = web::AppState::new(settings, Arc::new(PgUserStore::new(pool)))?;
    let router = web::router(state).layer(session_layer);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!("Server listening on {}", address);

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
