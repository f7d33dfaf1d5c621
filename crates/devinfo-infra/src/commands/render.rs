use crate::ui::{print_next_step, print_success};
use anyhow::{Context, Result};
use clap::Args;
use devinfo_infra::{InfraError, Manifest, Stack};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// 写入文件而不是标准输出
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run_render(stack: &Stack, args: RenderArgs) -> Result<()> {
    let manifest = Manifest::from_stack(stack)?;
    let json = manifest.to_json_pretty()?;

    match args.output {
        None => println!("{}", json),
        Some(path) => {
            std::fs::write(&path, format!("{}\n", json))
                .map_err(|source| InfraError::Io {
                    path: path.display().to_string(),
                    source,
                })
                .context("Failed to write manifest")?;
            print_success(&format!("Manifest written to {}", path.display()));
            print_next_step("Hand the manifest to the provisioning engine to apply it");
        }
    }
    Ok(())
}
