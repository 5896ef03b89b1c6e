//! SnowMesh CLI - Command-line interface for SnowRunner model files

pub mod commands;

use clap::Parser;
use commands::Commands;

use crate::formats::meshes::{AttributePolicy, DecodeOptions};

#[derive(Parser)]
#[command(name = "snowmesh")]
#[command(about = "SnowMesh: SnowRunner [meshes] model tools", long_about = None)]
struct Cli {
    /// Skip unrecognized vertex attributes instead of failing the mesh
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn decode_options(&self) -> DecodeOptions {
        let policy = if self.lenient {
            AttributePolicy::Lenient
        } else {
            AttributePolicy::Strict
        };
        DecodeOptions::new().with_attribute_policy(policy)
    }
}

/// Run the SnowMesh CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute(&cli.decode_options())?;

    Ok(())
}
