use clap::Parser;
use console::style;
use devinfo_core::telemetry::{LogConfig, init_tracing_with};

mod cli;
mod commands;
mod ui;

fn main() {
    let cli = cli::Cli::parse();

    init_tracing_with(&LogConfig {
        level: cli.log_level.clone(),
        format: "text".to_string(),
        no_ansi: false,
    });

    if let Err(e) = cli::run(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
