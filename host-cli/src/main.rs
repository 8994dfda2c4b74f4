use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shared::error::SharedError;

mod commands;
mod image;
mod script;

#[derive(Parser, Debug)]
#[command(author, version, about = "KeyMan EEPROM image tool and gadget simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an EEPROM image filled by a seeded regenerate pass.
    Init(InitArgs),
    /// Print the secret held in each slot of an image.
    Show(ImageArgs),
    /// Drive the firmware with a scripted button timeline and print what the host receives.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Path to the raw EEPROM image.
    #[arg(long, value_name = "PATH")]
    pub image: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Path of the image to create.
    #[arg(long, value_name = "PATH")]
    pub image: PathBuf,
    /// Tick value used to seed the generator.
    #[arg(long, default_value_t = 0)]
    pub seed: u16,
    /// Replace an existing image.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Image to load. It is rewritten afterwards if the run regenerated the slots.
    #[arg(long, value_name = "PATH")]
    pub image: PathBuf,
    /// Comma-separated steps: `tap`, `hold:TICKS`, `wait:TICKS`.
    #[arg(long, value_name = "STEPS")]
    pub script: String,
    /// JSON file overriding fields of the default configuration.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// The host collects a report only on every K-th pass.
    #[arg(long, value_name = "K", default_value_t = 1)]
    pub ready_every: u32,
    /// Polling passes between two timer ticks.
    #[arg(long, value_name = "P", default_value_t = 4)]
    pub passes_per_tick: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = commands::run(cli) {
        match &err {
            SharedError::Image(_) | SharedError::ImageSize { .. } => {
                eprintln!("Image failure: {err}");
            }
            SharedError::Script { .. } => {
                eprintln!("Invalid script: {err}");
            }
            SharedError::Config(_) => {
                eprintln!("Invalid configuration: {err}");
            }
            SharedError::Storage(_) => {
                eprintln!("Storage failure: {err}");
            }
        }
        return Err(anyhow::Error::from(err));
    }

    Ok(())
}
