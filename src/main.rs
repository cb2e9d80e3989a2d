//! vaultcache - track selected Destiny weapons from the community spreadsheet.
//!
//! Thin CLI front end over the core: the fixed category table, the sheet
//! fetcher, the persisted selection, and the hourly-refreshed weapon cache.

mod aggregator;
mod categories;
mod config;
mod models;
mod sheets;
mod store;
mod utils;

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aggregator::Aggregator;
use config::Config;
use sheets::SheetsClient;
use store::cache::WeaponCache;
use store::selection::{Selection, SelectionStore};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn build_aggregator() -> Result<Aggregator> {
    let config = Config::load()?;
    let client = SheetsClient::new(config.sheet_id().to_string())?;
    let selection = SelectionStore::new(Config::selection_path()?);
    let cache = WeaponCache::new(Config::cache_path()?);
    Ok(Aggregator::new(client, selection, cache))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("vaultcache starting");

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("categories") => list_categories(),
        Some("sheet") => show_sheet(args.get(2)).await?,
        Some("selection") => show_selection()?,
        Some("select") => save_selection(&args[2..])?,
        Some("saved") | None => show_saved().await?,
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }

    Ok(())
}

fn print_usage() {
    eprintln!("Usage: vaultcache [categories | sheet <gid> | selection | select <category> <name>... | saved]");
}

/// List the fixed category table (gid and display name).
fn list_categories() {
    for &(gid, name) in categories::CATEGORIES {
        println!("{:>12}  {}", gid, name);
    }
}

/// Fetch and print one category tab, bypassing the cache.
async fn show_sheet(gid: Option<&String>) -> Result<()> {
    let Some(gid) = gid.and_then(|g| g.parse::<i64>().ok()) else {
        print_usage();
        return Ok(());
    };
    let Some(name) = categories::name_for(gid) else {
        eprintln!("Unknown sheet id: {}", gid);
        return Ok(());
    };

    let agg = build_aggregator()?;
    let table = agg.raw_sheet(gid).await?;
    if table.is_empty() {
        println!("{}: no data", name);
        return Ok(());
    }

    println!("{}\n", name);
    print!("{}", utils::render_table(&table.headers, &table.rows));
    Ok(())
}

/// Print the current saved selection.
fn show_selection() -> Result<()> {
    let agg = build_aggregator()?;
    let selection = agg.selection()?;
    if selection.is_empty() {
        println!("No weapons selected");
        return Ok(());
    }
    for (category, names) in &selection {
        println!("{}: {}", category, names.join(", "));
    }
    Ok(())
}

/// Overwrite one category's selection with the given weapon names.
fn save_selection(args: &[String]) -> Result<()> {
    let Some((category, names)) = args.split_first() else {
        print_usage();
        return Ok(());
    };
    if !categories::is_known_name(category) {
        eprintln!("Unknown category: {}", category);
        return Ok(());
    }

    let agg = build_aggregator()?;
    let mut update = Selection::new();
    update.insert(category.clone(), names.to_vec());
    agg.save_selection(update)?;
    println!("Selection saved for {}", category);
    Ok(())
}

/// Print the aggregated saved-weapons view.
async fn show_saved() -> Result<()> {
    let agg = build_aggregator()?;
    let view = agg.saved_weapons().await?;
    if view.is_empty() {
        println!("No saved weapons to show");
        return Ok(());
    }

    for entry in &view {
        println!("{}\n", entry.category);
        print!("{}", utils::render_table(&entry.headers, &entry.rows));
        println!();
    }
    Ok(())
}
