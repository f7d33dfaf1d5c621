use crate::commands::{RenderArgs, run_outputs, run_plan, run_render};
use anyhow::{Context, Result};
use clap::Parser;
use devinfo_infra::{InfraConfig, declare_stack, read_public_key};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Declares the lab environment stack for the external provisioning engine",
    long_about = None,
    after_help = r#"Examples:
  # Show resources in dependency order
  devinfo-infra plan

  # Write the manifest for the engine
  devinfo-infra --config ./infra.toml render --output manifest.json

  # List stack outputs
  devinfo-infra outputs"#
)]
pub struct Cli {
    /// Configuration file path (defaults to ./infra.toml when present)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics (trace|debug|info|warn|error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// 按依赖顺序列出资源
    Plan,
    /// 输出 JSON 清单
    Render(RenderArgs),
    /// 列出栈输出及其表达式
    Outputs,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = InfraConfig::load(cli.config.as_deref()).context("Failed to load infra config")?;
    let public_key = read_public_key(&config.ssh_public_key_path)?;
    let stack = declare_stack(&config, &public_key).context("Failed to declare stack")?;
    info!(
        resources = stack.graph.len(),
        outputs = stack.outputs.len(),
        zone = %config.yc_zone,
        "stack ready"
    );

    match cli.command {
        Commands::Plan => run_plan(&stack),
        Commands::Render(args) => run_render(&stack, args),
        Commands::Outputs => run_outputs(&stack),
    }
}
