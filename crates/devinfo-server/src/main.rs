use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use devinfo_core::config::{ComponentConfig, DevinfoConfig};
use devinfo_core::telemetry::{LogConfig, init_tracing_with};
use devinfo_server::bootstrap::ServerBootstrapper;
use devinfo_server::domain::{ProcessClock, iso_timestamp};

#[derive(Parser)]
#[command(name = "devinfo-server")]
#[command(about = "DevOps info service - service status, host facts and liveness over HTTP")]
#[command(version)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bind host (overrides config and HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config and PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug mode (overrides config and DEBUG)
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 启动时间在进程入口捕获一次
    let clock = ProcessClock::start_now();
    let args = Args::parse();

    let cfg = DevinfoConfig::load_config(args.config.as_deref())
        .context("Failed to load devinfo configuration")?
        .with_overrides(args.host.clone(), args.port, args.debug);
    cfg.validate().context("Invalid command line overrides")?;

    init_tracing_with(&LogConfig::from_telemetry(
        &cfg.telemetry,
        cfg.effective_log_level(),
    ));

    tracing::debug!(
        sources = ?DevinfoConfig::loader(args.config.as_deref()).describe_sources(),
        "configuration sources"
    );
    tracing::info!("Starting DevOps Info Service on {}", cfg.bind_address());
    tracing::info!("Debug mode: {}", cfg.debug);
    tracing::info!("Application started at {}", iso_timestamp(clock.start_time()));

    let running_server = ServerBootstrapper::new(cfg, clock).start().await?;

    running_server.wait_for_shutdown().await
}
