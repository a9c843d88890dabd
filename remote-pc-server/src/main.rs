use anyhow::Result;
use clap::Parser;
use remote_pc_dispatch::Dispatcher;
use remote_pc_executor::ActionExecutor;
use remote_pc_server::{logging, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "remote-pc", version, about = "HTTP remote control for desktop OS actions")]
struct Cli {
    /// YAML config file (defaults to ./remote-pc.yaml when present)
    #[arg(short, long, env = "REMOTE_PC_CONFIG")]
    config: Option<PathBuf>,

    /// Listen host, overrides config and environment
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides config and environment
    #[arg(short, long)]
    port: Option<u16>,
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.validate()?;

    logging::init(&config.log_level)?;

    let executor = ActionExecutor::native(config.key_timing.to_timing(), config.command_timeout());
    info!("Executor platform: {}", executor.platform().as_str());
    if let Some(timeout) = config.command_timeout() {
        info!("Utility command timeout: {:?}", timeout);
    }

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(executor)));
    remote_pc_server::serve(&config, dispatcher, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}
