//! Main entry point for the MedEasy clinic backend.
//!
//! Initialises logging, resolves configuration from the environment once,
//! opens the SQLite store, and serves the REST API.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medeasy_core::{CoreConfig, Database};

/// Starts the MedEasy REST server.
///
/// # Environment Variables
/// - `MEDEASY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDEASY_DB_PATH`: SQLite database file (default: "medeasy.db")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medeasy=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("medeasy_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDEASY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    tracing::info!("++ Starting MedEasy REST on {}", rest_addr);

    let cfg = CoreConfig::from_env_value(std::env::var("MEDEASY_DB_PATH").ok());
    let db = Database::open(cfg.db_path()).map_err(|e| anyhow::anyhow!("opening store: {e}"))?;

    let app = router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
