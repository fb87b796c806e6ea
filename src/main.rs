//! Three-tier demo API - main entry point.

use clap::Parser;
use tier_demo_api::api::AppState;
use tier_demo_api::config::Config;
use tier_demo_api::db::{DbPool, SchemaInitializer};
use tier_demo_api::transport::HttpTransport;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    init_tracing(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    let database = config.database()?;

    info!(
        environment = %config.environment,
        database = %format!("{}:{}", database.host, database.port),
        "Starting tier-demo-api v{}",
        env!("CARGO_PKG_VERSION")
    );

    let pool = DbPool::connect_lazy(&database, &config.pool_options());

    // Runs alongside the server: a database that is still starting must not
    // delay the listener.
    let init_pool = pool.clone();
    tokio::spawn(async move {
        SchemaInitializer::run(&init_pool).await;
    });

    let transport = HttpTransport::new(AppState::new(pool), &config.host, config.port);

    if let Err(e) = transport.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
