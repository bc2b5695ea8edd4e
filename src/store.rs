// Expense store - ordered records backed by a CSV file
// Every mutation is written through to disk before returning

use crate::error::{SkippedRow, StoreError};
use crate::record::{ExpenseInput, Record, RecordRow, CSV_HEADER};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_FILE: &str = "expenses.csv";

#[derive(Debug)]
pub struct ExpenseStore {
    path: PathBuf,
    records: Vec<Record>,
    skipped: Vec<SkippedRow>,
}

impl ExpenseStore {
    /// Load the store from `path`.
    ///
    /// A missing file gives an empty store. Rows that fail to parse or
    /// validate are skipped, logged, and kept in [`ExpenseStore::skipped`];
    /// the remaining rows still load. Skipped rows are not kept in memory,
    /// so the next save rewrites the file without them.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut store = ExpenseStore {
            path,
            records: Vec::new(),
            skipped: Vec::new(),
        };

        if !store.path.exists() {
            info!(path = %store.path.display(), "backing file not found, starting empty");
            return Ok(store);
        }

        let file = File::open(&store.path).map_err(|e| StoreError::io(&store.path, e))?;
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| csv_failure(&store.path, e))?
            .clone();

        for result in reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(csv_failure(&store.path, e)),
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    store.skip_row(line, e.to_string());
                    continue;
                }
            };
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            let parsed = row
                .deserialize::<RecordRow>(Some(&headers))
                .map_err(|e| e.to_string())
                .and_then(|raw| Record::try_from(raw).map_err(|e| e.to_string()));

            match parsed {
                Ok(record) => store.records.push(record),
                Err(reason) => store.skip_row(line, reason),
            }
        }

        info!(
            path = %store.path.display(),
            records = store.records.len(),
            skipped = store.skipped.len(),
            "loaded expenses"
        );
        Ok(store)
    }

    fn skip_row(&mut self, line: u64, reason: String) {
        warn!(path = %self.path.display(), line, %reason, "skipping malformed row");
        self.skipped.push(SkippedRow { line, reason });
    }

    /// Validate `input`, append it and persist the whole store.
    ///
    /// When the write fails the record is dropped again so memory and
    /// disk agree, and the error is returned.
    pub fn add(&mut self, input: ExpenseInput) -> Result<&Record, StoreError> {
        let record = Record::try_from(input)?;
        let index = self.records.len();
        self.records.push(record);

        if let Err(err) = self.save() {
            self.records.pop();
            return Err(err);
        }

        debug!(
            name = self.records[index].name(),
            amount = %self.records[index].amount(),
            "added expense"
        );
        Ok(&self.records[index])
    }

    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// The last `limit` records in store order. `None` or 0 means all of them.
    pub fn recent(&self, limit: Option<usize>) -> &[Record] {
        let len = self.records.len();
        match limit {
            Some(n) if n > 0 && n < len => &self.records[len - n..],
            _ => &self.records,
        }
    }

    /// Overwrite the backing file with the current records.
    pub fn save(&self) -> Result<(), StoreError> {
        write_csv(&self.path, &self.records)?;
        info!(path = %self.path.display(), records = self.records.len(), "saved expenses");
        Ok(())
    }

    /// Write the records to `target` in the backing file's format.
    pub fn export(&self, target: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let target = target.as_ref();
        write_csv(target, &self.records)?;
        info!(path = %target.display(), records = self.records.len(), "exported expenses");
        Ok(target.to_path_buf())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows ignored by the last load.
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }
}

/// I/O failures surface as `Io` errors, malformed data stays `Csv`.
fn csv_failure(path: &Path, err: csv::Error) -> StoreError {
    if let csv::ErrorKind::Io(source) = err.kind() {
        return StoreError::io(path, io::Error::new(source.kind(), source.to_string()));
    }
    StoreError::csv(path, err)
}

// ============================================================================
// CSV WRITING
// ============================================================================

/// Write to a sibling temp file, then rename over `path`.
fn write_csv(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_rows(&temp_path, records)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| StoreError::io(path, e)));

    if result.is_err() && temp_path.exists() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_rows(path: &Path, records: &[Record]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_failure(path, e))?;

    // serialize() only emits the header together with the first row
    if records.is_empty() {
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| csv_failure(path, e))?;
    }
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| csv_failure(path, e))?;
    }

    writer.flush().map_err(|e| StoreError::io(path, e))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(DEFAULT_FILE));
    name.push(".tmp");
    path.with_file_name(name)
}
