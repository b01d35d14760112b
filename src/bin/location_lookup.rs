// src/bin/location_lookup.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use unification_lib::catalog::search::DEFAULT_SEARCH_LIMIT;
use unification_lib::catalog::{find_by_provider, find_by_unified_id, load_snapshot, search};
use unification_lib::utils::constants::DEFAULT_UNIFIED_LOCATIONS_PATH;
use unification_lib::utils::env::{env_or, load_env};

#[derive(Parser)]
#[command(author, version, about = "Query a unified locations snapshot", long_about = None)]
struct Args {
    /// Snapshot to read (defaults to UNIFIED_LOCATIONS_PATH)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Keyword search over names, cities, countries and aliases
    Search {
        term: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Resolve a supplier pickup id to its unified location
    Provider { provider: String, pickup_id: String },
    /// Look up a unified location by id
    Id { id: u32 },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    load_env();
    let args = Args::parse();

    let snapshot = args.snapshot.unwrap_or_else(|| {
        PathBuf::from(env_or(
            "UNIFIED_LOCATIONS_PATH",
            DEFAULT_UNIFIED_LOCATIONS_PATH.to_string(),
        ))
    });
    let set = load_snapshot(&snapshot)
        .await
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;
    info!("Catalog holds {} unified locations", set.len());

    match args.command {
        Command::Search { term, limit } => {
            let results = search(&set, &term, limit);
            info!("{} results for {:?}", results.len(), term);
            print_json(&results)
        }
        Command::Provider { provider, pickup_id } => {
            print_json(&find_by_provider(&set, &provider, &pickup_id))
        }
        Command::Id { id } => print_json(&find_by_unified_id(&set, id)),
    }
}
