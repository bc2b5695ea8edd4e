// Command-line configuration
// Every flag is optional; without flags the tool behaves like the plain menu program

use crate::store::DEFAULT_FILE;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "expense-log", version)]
#[command(about = "Log expenses to a CSV file and summarize them by category and month")]
pub struct Config {
    /// Backing CSV file expenses are loaded from and saved to.
    #[arg(long, short, env = "EXPENSE_LOG_FILE", default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// Symbol printed in front of amounts.
    #[arg(long, env = "EXPENSE_LOG_CURRENCY", default_value = "₹")]
    pub currency: String,

    /// Log filter used when RUST_LOG is not set (logs go to stderr).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
