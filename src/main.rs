use anyhow::{Context, Result};
use ezcoin_rust::{ChainParamsRegistry, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging, RUST_LOG wins over --loglevel
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting EZCoin Rust node...");

    // Every network is built and its genesis block checked before anything else runs
    let mut registry = ChainParamsRegistry::new().context("chain parameter self-check failed")?;

    for vb in &config.deployment_overrides {
        registry
            .update_regtest_deployment(vb.deployment, vb.start_time, vb.timeout)
            .with_context(|| format!("cannot apply --vbparams for {}", vb.deployment.name()))?;
    }

    let params = registry.select_network(config.network)?;

    info!("Loaded configuration for network: {}", params.network);
    info!("Genesis block: {}", params.genesis_hash());
    info!(
        "Message start: {}, port: {}",
        params.message_start,
        config.port(&params)
    );
    if let Some(height) = params.checkpoints.last_height() {
        info!("Last checkpoint at height {}", height);
    }
    for (pos, deployment) in params.consensus.deployments.iter() {
        info!(
            "Deployment {}: bit {}, start {}, timeout {}",
            pos.name(),
            deployment.bit,
            deployment.start_time,
            deployment.timeout
        );
    }

    Ok(())
}
