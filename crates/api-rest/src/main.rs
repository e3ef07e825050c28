//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, with OpenAPI/Swagger UI. The
//! workspace's main `medeasy-run` binary is the normal entry point; this one
//! is useful for development and debugging of the REST surface.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medeasy_core::{CoreConfig, Database};

/// Entry point for the standalone MedEasy REST API server.
///
/// # Environment Variables
/// - `MEDEASY_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `MEDEASY_DB_PATH`: SQLite database file (default: "medeasy.db")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the database cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("medeasy_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDEASY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    tracing::info!("-- Starting MedEasy REST API on {}", addr);

    let cfg = CoreConfig::from_env_value(std::env::var("MEDEASY_DB_PATH").ok());
    let db = Database::open(cfg.db_path()).map_err(|e| anyhow::anyhow!("opening store: {e}"))?;

    let app = router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
