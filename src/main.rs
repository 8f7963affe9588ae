use std::sync::Arc;

use clap::Parser;
use tracing::info;

use flotilla::{
    api::{start_api_server, ApiState},
    config::AppConfig,
    observability::{init_observability, log_config_info},
    provider::build_registry,
    services::NlbService,
    storage::{create_pool, SqlNlbStore},
    Result, APP_NAME, VERSION,
};

/// Multi-cloud NLB control plane
#[derive(Debug, Parser)]
#[command(name = "flotilla", version, about)]
struct Cli {
    /// Override the API bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the API bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; config is read from the environment below
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    let _log_guard = init_observability(&config.observability)?;

    info!(app_name = APP_NAME, version = VERSION, "Starting flotilla control plane");
    log_config_info(&config);

    let pool = create_pool(&config.database).await?;
    let store = Arc::new(SqlNlbStore::new(pool));

    let registry = Arc::new(build_registry(&config.provider)?);
    info!(
        providers = ?registry.registered_providers(),
        connections = registry.connection_count(),
        "Provider driver registry initialized"
    );

    let service = Arc::new(
        NlbService::new(store, registry)
            .with_provider_timeout(config.provider.request_timeout())
            .with_delete_concurrency(config.provider.delete_concurrency),
    );

    start_api_server(&config.server, ApiState::new(service)).await?;

    info!("Control plane shutdown completed");
    Ok(())
}
