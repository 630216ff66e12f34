use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use fabcar_contract::{
    AssetContract, AssetService, Car, ContractConfig, ContractResult, StoreContext,
    TransactionContext,
};
use fabcar_events::{ChaincodeEvent, EventBus};
use fabcar_store::{load_snapshot, save_snapshot, InMemoryLedgerStore};
use tracing::{debug, warn};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ContractConfig::load(path)?,
        None => ContractConfig::default(),
    };
    let bus = Arc::new(EventBus::with_capacity(config.event_channel_capacity));
    let entries = load_snapshot(&cli.state)
        .with_context(|| format!("loading world state from {}", cli.state.display()))?;
    let store = InMemoryLedgerStore::from_snapshot(entries, bus.clone());
    let contract = AssetContract::new(config);
    let ctx = StoreContext::new(&store);
    debug!(tx_id = ctx.tx_id(), state = %cli.state.display(), "running command");

    match cli.command {
        Command::Init => {
            let result = contract.init_ledger(&ctx);
            finish(result, persist(&store, &cli.state))?;
            println!("{} Ledger initialized with {} cars", "✓".green().bold(), fabcar_types::SEED_COUNT);
        }
        Command::Create(args) => {
            let result = contract.create_car(
                &ctx,
                &args.asset_id,
                &args.make,
                &args.model,
                &args.color,
                &args.owner,
            );
            print_events(&bus.drain());
            finish(result, persist(&store, &cli.state))?;
            println!("{} Car {} created", "✓".green().bold(), args.asset_id.yellow());
        }
        Command::QueryAll => {
            let cars = contract.query_all_cars(&ctx)?;
            print_cars(&cars, &cli.format)?;
        }
        Command::Query(args) => {
            let car = contract.query_car(&ctx, &args.asset_id)?;
            print_cars(std::slice::from_ref(&car), &cli.format)?;
        }
    }
    Ok(())
}

/// Save whatever world state the operation left behind, including partial
/// writes of a failed operation.
fn persist(store: &InMemoryLedgerStore, path: &Path) -> anyhow::Result<()> {
    save_snapshot(path, &store.snapshot()?)
        .with_context(|| format!("saving world state to {}", path.display()))
}

/// Combine an operation outcome with the save that followed it. When both
/// fail, the operation error leads and the save failure is attached.
fn finish(result: ContractResult<()>, saved: anyhow::Result<()>) -> anyhow::Result<()> {
    match (result, saved) {
        (Ok(()), saved) => saved,
        (Err(err), Ok(())) => Err(err.into()),
        (Err(err), Err(save_err)) => {
            warn!(error = %save_err, "world state not saved after failed operation");
            Err(anyhow::Error::new(err).context(format!("world state not saved: {save_err:#}")))
        }
    }
}

fn print_events(events: &[ChaincodeEvent]) {
    for event in events {
        println!("  {} {}", "event:".cyan(), event);
    }
}

fn print_cars(cars: &[Car], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(cars)?),
        OutputFormat::Text => {
            if cars.is_empty() {
                println!("No cars.");
            }
            for car in cars {
                println!(
                    "{}  {} {} {}  owner: {}",
                    car.asset_id.yellow().bold(),
                    car.make,
                    car.model,
                    car.color.dimmed(),
                    car.owner.bold()
                );
            }
        }
    }
    Ok(())
}
