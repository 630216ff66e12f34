use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fabcar",
    about = "fabcar: car asset ledger over a local world-state snapshot",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// World-state snapshot file
    #[arg(long, global = true, default_value = "fabcar-state.json")]
    pub state: PathBuf,

    /// Contract configuration (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Seed the ledger with the six fixed cars
    Init,
    /// Create a car, replacing any car with the same ID
    Create(CreateArgs),
    /// List every car in key order
    QueryAll,
    /// Show a single car
    Query(QueryArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    pub asset_id: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub owner: String,
}

#[derive(Args)]
pub struct QueryArgs {
    pub asset_id: String,
}
