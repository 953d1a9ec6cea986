use clap::Parser;
use cloudflare_exporter::{
    init_errors,
    init_logging,
    server,
};
use cloudflare_exporter_collector::Orchestrator;
use cloudflare_exporter_config::{
    Args,
    Config,
};
use color_eyre::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    init_logging()?;

    let config = Config::new(Args::parse())?;
    let orchestrator = Orchestrator::new(&config)?;
    server::start_server(config.listen_address, Arc::new(orchestrator)).await
}
