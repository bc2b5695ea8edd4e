use expense_log::{parse_date, summary, ExpenseInput, ExpenseStore, Record};
use std::io::{self, BufRead, Write};

const DEFAULT_EXPORT: &str = "export.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Add,
    List,
    Total,
    ByCategory,
    ByMonth,
    Export,
    Quit,
}

impl Choice {
    pub const ALL: [Choice; 7] = [
        Choice::Add,
        Choice::List,
        Choice::Total,
        Choice::ByCategory,
        Choice::ByMonth,
        Choice::Export,
        Choice::Quit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        let number: usize = input.trim().parse().ok()?;
        Self::ALL.get(number.checked_sub(1)?).copied()
    }

    pub fn title(&self) -> &str {
        match self {
            Choice::Add => "Add expense",
            Choice::List => "List expenses",
            Choice::Total => "Show total spent",
            Choice::ByCategory => "Summary by category",
            Choice::ByMonth => "Summary by month",
            Choice::Export => "Export CSV",
            Choice::Quit => "Quit",
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Interactive menu loop. Owns the store for the whole session.
pub struct Menu<R, W> {
    store: ExpenseStore,
    input: R,
    output: W,
    currency: String,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(store: ExpenseStore, input: R, output: W, currency: impl Into<String>) -> Self {
        Self {
            store,
            input,
            output,
            currency: currency.into(),
        }
    }

    /// Run until Quit is chosen or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\nChoose an option:")?;
            for (i, choice) in Choice::ALL.iter().enumerate() {
                writeln!(self.output, "{}. {}", i + 1, choice.title())?;
            }

            let Some(answer) = self.prompt("Enter choice (1-7): ")? else {
                break;
            };

            let flow = match Choice::parse(&answer) {
                Some(Choice::Add) => self.add()?,
                Some(Choice::List) => self.list()?,
                Some(Choice::Total) => self.total()?,
                Some(Choice::ByCategory) => self.by_category()?,
                Some(Choice::ByMonth) => self.by_month()?,
                Some(Choice::Export) => self.export()?,
                Some(Choice::Quit) => Flow::Quit,
                None => {
                    writeln!(self.output, "Invalid choice. Enter 1-7.")?;
                    Flow::Continue
                }
            };

            if let Flow::Quit = flow {
                break;
            }
        }

        writeln!(
            self.output,
            "Goodbye, your data is saved in {}",
            self.store.path().display()
        )?;
        self.output.flush()
    }

    /// Print `label`, read one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn add(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Expense name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(amount) = self.prompt("Amount (numeric): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(category) = self.prompt("Category (e.g., Food, Travel, Bills): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(date) = self.prompt("Date (YYYY-MM-DD) [press enter for today]: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(note) = self.prompt("Notes (optional): ")? else {
            return Ok(Flow::Quit);
        };

        let date = if date.is_empty() {
            None
        } else {
            match parse_date(&date) {
                Ok(date) => Some(date),
                Err(e) => {
                    writeln!(self.output, "Not added: {}", e)?;
                    return Ok(Flow::Continue);
                }
            }
        };

        let input = ExpenseInput {
            name,
            amount,
            category,
            date,
            note,
        };

        let index = self.store.len() + 1;
        match self.store.add(input) {
            Ok(record) => {
                let line = format_record(index, record, &self.currency);
                writeln!(self.output, "Added:\n{}", line)?;
            }
            Err(e) if e.is_validation() => writeln!(self.output, "Not added: {}", e)?,
            Err(e) => writeln!(self.output, "Expense was NOT saved: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> io::Result<Flow> {
        let Some(answer) = self.prompt("Show last N entries (press enter for all): ")? else {
            return Ok(Flow::Quit);
        };
        let limit = answer.parse::<usize>().ok();

        let records = self.store.recent(limit);
        if records.is_empty() {
            writeln!(self.output, "No expenses recorded yet.")?;
            return Ok(Flow::Continue);
        }

        let offset = self.store.len() - records.len();
        for (i, record) in records.iter().enumerate() {
            writeln!(
                self.output,
                "{}",
                format_record(offset + i + 1, record, &self.currency)
            )?;
        }
        Ok(Flow::Continue)
    }

    fn total(&mut self) -> io::Result<Flow> {
        let total = summary::total(self.store.all());
        writeln!(self.output, "Total spent: {}{}", self.currency, total)?;
        Ok(Flow::Continue)
    }

    fn by_category(&mut self) -> io::Result<Flow> {
        let breakdown = summary::by_category(self.store.all());
        if breakdown.is_empty() {
            writeln!(self.output, "No records yet.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "Spending by category:")?;
        for (category, amount) in breakdown.sorted_by_amount() {
            writeln!(self.output, " - {}: {}{}", category, self.currency, amount)?;
        }
        Ok(Flow::Continue)
    }

    fn by_month(&mut self) -> io::Result<Flow> {
        let breakdown = summary::by_month(self.store.all());
        if breakdown.is_empty() {
            writeln!(self.output, "No records yet.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "Spending by month:")?;
        for (month, amount) in breakdown.sorted_by_key() {
            writeln!(self.output, " - {}: {}{}", month, self.currency, amount)?;
        }
        Ok(Flow::Continue)
    }

    fn export(&mut self) -> io::Result<Flow> {
        let Some(answer) = self.prompt("Export filename [default: export.csv]: ")? else {
            return Ok(Flow::Quit);
        };
        let target = if answer.is_empty() {
            DEFAULT_EXPORT.to_string()
        } else {
            answer
        };

        match self.store.export(&target) {
            Ok(path) => writeln!(self.output, "Exported to {}", path.display())?,
            Err(e) => writeln!(self.output, "Export failed, nothing written: {}", e)?,
        }
        Ok(Flow::Continue)
    }
}

fn format_record(index: usize, record: &Record, currency: &str) -> String {
    format!(
        "[{}] {} | {} | {}{} | {} | {}",
        index,
        record.date(),
        record.name(),
        currency,
        record.amount(),
        record.category(),
        record.note().unwrap_or("")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_log::{Amount, DEFAULT_FILE};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(script: &str) -> (String, ExpenseStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ExpenseStore::load(temp_dir.path().join(DEFAULT_FILE)).unwrap();

        let mut menu = Menu::new(store, Cursor::new(script.to_string()), Vec::new(), "₹");
        menu.run().unwrap();

        let output = String::from_utf8(menu.output).unwrap();
        (output, menu.store, temp_dir)
    }

    const COFFEE_AND_BUS: &str = "1\nCoffee\n4.50\nFood\n2024-01-05\n\n\
                                  1\nBus\n2\nTransport\n2024-01-06\nto work\n";

    #[test]
    fn test_choice_parse() {
        assert_eq!(Choice::parse("1"), Some(Choice::Add));
        assert_eq!(Choice::parse(" 7 "), Some(Choice::Quit));
        assert_eq!(Choice::parse("0"), None);
        assert_eq!(Choice::parse("8"), None);
        assert_eq!(Choice::parse("add"), None);
    }

    #[test]
    fn test_add_and_total() {
        let script = format!("{}3\n7\n", COFFEE_AND_BUS);
        let (output, store, _temp_dir) = run_script(&script);

        assert!(output.contains("Added:\n[1] 2024-01-05 | Coffee | ₹4.50 | Food | "));
        assert!(output.contains("[2] 2024-01-06 | Bus | ₹2.00 | Transport | to work"));
        assert!(output.contains("Total spent: ₹6.50"));
        assert!(output.contains("Goodbye, your data is saved in"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_summaries() {
        let script = format!("{}4\n5\n7\n", COFFEE_AND_BUS);
        let (output, _store, _temp_dir) = run_script(&script);

        assert!(output.contains("Spending by category:\n - Food: ₹4.50\n - Transport: ₹2.00\n"));
        assert!(output.contains("Spending by month:\n - 2024-01: ₹6.50\n"));
    }

    #[test]
    fn test_empty_views() {
        let (output, _store, _temp_dir) = run_script("2\n\n3\n4\n5\n7\n");

        assert!(output.contains("No expenses recorded yet."));
        assert!(output.contains("Total spent: ₹0.00"));
        assert_eq!(output.matches("No records yet.").count(), 2);
    }

    #[test]
    fn test_invalid_amount_not_added() {
        let (output, store, _temp_dir) = run_script("1\nCoffee\n0\nFood\n2024-01-05\n\n7\n");

        assert!(output.contains("Not added: amount must be greater than zero"));
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_decimal_comma_not_added() {
        let (output, store, _temp_dir) = run_script("1\nCoffee\n4,50\nFood\n2024-01-05\n\n7\n");

        assert!(output.contains("Not added: invalid amount '4,50'"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_date_not_added() {
        let (output, store, _temp_dir) = run_script("1\nCoffee\n4.50\nFood\n5 Jan\n\n7\n");

        assert!(output.contains("Not added: invalid date '5 Jan'"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_last_n() {
        let script = format!("{}2\n1\n7\n", COFFEE_AND_BUS);
        let (output, _store, _temp_dir) = run_script(&script);

        let listing = output
            .split("Show last N entries (press enter for all): ")
            .nth(1)
            .unwrap();
        assert!(listing.starts_with("[2] 2024-01-06 | Bus"));
        assert!(!listing.contains("Coffee"));
    }

    #[test]
    fn test_export_to_named_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out.csv");
        let script = format!("{}6\n{}\n7\n", COFFEE_AND_BUS, target.display());
        let (output, store, _store_dir) = run_script(&script);

        assert!(output.contains(&format!("Exported to {}", target.display())));
        assert_eq!(
            std::fs::read(&target).unwrap(),
            std::fs::read(store.path()).unwrap()
        );
    }

    #[test]
    fn test_invalid_choice_and_eof() {
        let (output, _store, _temp_dir) = run_script("9\n");

        assert!(output.contains("Invalid choice. Enter 1-7."));
        assert!(output.contains("Goodbye"));
    }

    #[test]
    fn test_eof_during_add_quits_without_saving() {
        let (output, store, _temp_dir) = run_script("1\nCoffee\n4.50\n");

        assert!(output.contains("Goodbye"));
        assert!(store.is_empty());
        assert_eq!(summary::total(store.all()), Amount::ZERO);
    }
}
