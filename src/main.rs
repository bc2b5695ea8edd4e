mod menu;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

use expense_log::{Config, ExpenseStore, VERSION};
use menu::Menu;

fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config.log_level);

    println!("=== Expense Log v{} ===", VERSION);

    let store = ExpenseStore::load(&config.file)
        .with_context(|| format!("Failed to load expenses from {}", config.file.display()))?;

    println!("✓ Loaded {} expenses from {}", store.len(), store.path().display());
    if !store.skipped().is_empty() {
        eprintln!(
            "⚠ Skipped {} malformed rows in {}:",
            store.skipped().len(),
            store.path().display()
        );
        for row in store.skipped() {
            eprintln!("   {}", row);
        }
        eprintln!("   These rows will be dropped from the file on the next save.");
    }

    let stdin = io::stdin();
    let mut menu = Menu::new(store, stdin.lock(), io::stdout(), config.currency);
    menu.run().context("Terminal I/O failed")?;

    Ok(())
}

/// Logs go to stderr so they don't interleave with menu output.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
