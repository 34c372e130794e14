//! Schema migration runner
//!
//! Run with:
//! ```bash
//! cargo run -p arranke-service --bin arranke-migrate
//! ```
//!
//! Loads the usual environment configuration (a `.env` file is honoured) and
//! applies pending migrations from `MIGRATIONS_DIR`.

use anyhow::Context;
use arranke_common::{try_init_tracing, AppConfig};
use arranke_db::{create_pool, run_migrations, DatabaseConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Migration failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;

    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .context("connecting to PostgreSQL")?;

    info!(dir = %config.database.migrations_dir, "Applying migrations");
    run_migrations(&pool, &config.database.migrations_dir)
        .await
        .context("applying migrations")?;

    info!("Migrations applied");
    Ok(())
}
