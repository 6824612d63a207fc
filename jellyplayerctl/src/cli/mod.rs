mod config;
mod script;
mod simulate;
mod trickplay;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jellyplayer_config::{ConfigLoad, ConfigLoader};

pub use config::ConfigArgs;
pub use simulate::SimulateArgs;
pub use trickplay::TrickplayArgs;

#[derive(Debug, Parser)]
#[command(
    name = "jellyplayerctl",
    version,
    about = "Drive the Jellyplayer playback core without a UI"
)]
pub struct Cli {
    /// Player config file (TOML or JSON). Without it the
    /// JELLYPLAYER_CONFIG_PATH / JELLYPLAYER_CONFIG_JSON lookup applies.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a scripted session against a simulated element and print one
    /// JSON state snapshot per step
    Simulate(SimulateArgs),
    /// Show which trickplay sheet and tile a hover position maps to
    Trickplay(TrickplayArgs),
    /// Print the effective player configuration and where it came from
    Config(ConfigArgs),
}

pub async fn run(cli: Cli) -> Result<()> {
    let load = load_config(cli.config)?;
    match cli.command {
        Command::Simulate(args) => simulate::run(args, &load.config).await,
        Command::Trickplay(args) => trickplay::run(args, &load.config),
        Command::Config(args) => config::run(args, &load),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ConfigLoad> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    Ok(loader.load()?)
}
