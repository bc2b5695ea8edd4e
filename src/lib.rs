// Expense Log - Core Library
// Record model, CSV-backed store and summaries used by the menu binary

pub mod amount;
pub mod config;
pub mod error;
pub mod record;
pub mod store;
pub mod summary;

// Re-export commonly used types
pub use amount::Amount;
pub use config::Config;
pub use error::{SkippedRow, StoreError, ValidationError};
pub use record::{parse_date, ExpenseInput, Month, Record, CSV_HEADER, DEFAULT_CATEGORY};
pub use store::{ExpenseStore, DEFAULT_FILE};
pub use summary::{by_category, by_month, total, Breakdown};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
