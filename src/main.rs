//! colillas: HTTP service for listing payroll batches and printing pay stubs.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use colillas::api::{AppState, create_router};
use colillas::config::ConfigLoader;
use colillas::odoo::{JsonRpcClient, WebSessionClient};
use colillas::pipeline::Pipeline;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "colillas", version, about)]
struct Args {
    /// YAML configuration file.
    #[arg(short, long, env = "COLILLAS_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config and COLILLAS_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and COLILLAS_PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting colillas v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let loader = match ConfigLoader::load(args.config.as_deref()) {
        Ok(loader) => loader.with_server_overrides(args.host, args.port),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    let odoo = loader.odoo();
    info!(url = %odoo.url, database = %odoo.database, "Using Odoo backend");

    let http = reqwest::Client::builder().build()?;
    let records = Arc::new(JsonRpcClient::new(http.clone(), odoo));
    let documents = Arc::new(WebSessionClient::new(http, odoo));
    let app = create_router(AppState::new(Pipeline::new(records, documents)));

    let address = loader.server().bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("colillas listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
