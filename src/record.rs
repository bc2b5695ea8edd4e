// Expense records - one row of the backing file
// A Record can only be built through validation, so every Record in memory is well-formed

use crate::amount::Amount;
use crate::error::ValidationError;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column order of the backing file and of exports.
pub const CSV_HEADER: [&str; 5] = ["name", "amount", "category", "date", "note"];

// ============================================================================
// RECORD
// ============================================================================

/// One logged expense. Fields are read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    name: String,
    amount: Amount,
    category: String,
    date: NaiveDate,
    note: Option<String>,
}

impl Record {
    /// Validate and build a record.
    ///
    /// The name is trimmed and must not be empty, the amount must be
    /// strictly positive. A blank category becomes [`DEFAULT_CATEGORY`].
    pub fn new(
        name: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount(amount));
        }

        let category = category.into().trim().to_string();
        let category = if category.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category
        };

        Ok(Record {
            name,
            amount,
            category,
            date,
            note: None,
        })
    }

    /// Builder pattern: attach a note. Blank notes are dropped.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into().trim().to_string();
        self.note = if note.is_empty() { None } else { Some(note) };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn month(&self) -> Month {
        Month::of(self.date)
    }
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// Unvalidated expense as typed by the user.
///
/// `date: None` means "today" in local time.
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub name: String,
    pub amount: String,
    pub category: String,
    pub date: Option<NaiveDate>,
    pub note: String,
}

impl TryFrom<ExpenseInput> for Record {
    type Error = ValidationError;

    fn try_from(input: ExpenseInput) -> Result<Self, Self::Error> {
        let amount: Amount = input.amount.parse()?;
        let date = input.date.unwrap_or_else(|| Local::now().date_naive());
        Ok(Record::new(input.name, amount, input.category, date)?.with_note(input.note))
    }
}

/// Raw CSV row, before validation. `note` may be missing in short rows.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordRow {
    name: String,
    amount: String,
    category: String,
    date: String,
    #[serde(default)]
    note: String,
}

impl TryFrom<RecordRow> for Record {
    type Error = ValidationError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let amount: Amount = row.amount.parse()?;
        let date = parse_date(&row.date)?;
        Ok(Record::new(row.name, amount, row.category, date)?.with_note(row.note))
    }
}

pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))
}

// ============================================================================
// MONTH KEY
// ============================================================================

/// Calendar month used to group records. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
