//! Recruitly API server binary.

use clap::Parser;
use recruitly_server::logging::init_tracing;
use recruitly_server::network::handlers::{CurrentTenant, CurrentTenantHandler};
use recruitly_server::network::NetworkModule;
use recruitly_server::{Mediator, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_tracing(&config.logging())?;

    let mediator = Mediator::builder()
        .with_config(config.pipeline())
        .register::<CurrentTenant, _>(CurrentTenantHandler)
        .require::<CurrentTenant>()
        .build()?;

    let mut module = NetworkModule::new(config.network(), mediator);
    let port = module.start().await?;
    info!(port, "api server started");

    module.serve(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
