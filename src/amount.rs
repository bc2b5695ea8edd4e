// Money amounts backed by rust_decimal
// Text form is always two decimals ("4.50"), which is what the CSV file carries

use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

const CURRENCY_SYMBOLS: &[char] = &['$', '₹'];

/// Largest magnitude a single entry may have (one trillion).
const MAX_ENTRY: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn from_cents(cents: i64) -> Self {
        Amount(Decimal::new(cents, 2))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    /// Accepts "4", "4.5", "4.50", "$1,234.00".
    ///
    /// Commas are only valid as thousands separators in groups of three.
    /// More than two decimals is rejected, not rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || ValidationError::InvalidAmount(raw.to_string());

        let unsigned = raw.trim_start_matches(CURRENCY_SYMBOLS).trim();
        let (negative, unsigned) = match unsigned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, unsigned),
        };

        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let whole = strip_thousands(whole).ok_or_else(invalid)?;

        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !digits_only(&whole) || !digits_only(frac) || (whole.is_empty() && frac.is_empty()) {
            return Err(invalid());
        }

        let text = if frac.is_empty() {
            whole
        } else {
            format!("{}.{}", whole, frac)
        };
        let mut value = Decimal::from_str(&text).map_err(|_| invalid())?;

        if value.normalize().scale() > 2 {
            return Err(invalid());
        }
        if value > Decimal::from(MAX_ENTRY) {
            return Err(ValidationError::AmountTooLarge(raw.to_string()));
        }

        value.rescale(2);
        Ok(Amount(if negative && !value.is_zero() { -value } else { value }))
    }
}

/// "1,234,567" -> "1234567". None for misplaced commas ("4,50", "1,,2").
fn strip_thousands(whole: &str) -> Option<String> {
    if !whole.contains(',') {
        return Some(whole.to_string());
    }

    let mut groups = whole.split(',');
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 {
        return None;
    }
    if groups.any(|group| group.len() != 3) {
        return None;
    }
    Some(whole.replace(',', ""))
}

impl TryFrom<String> for Amount {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// Entries are capped at MAX_ENTRY, so a sum only saturates past ~7.9e16 records
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_decimal() {
        assert_eq!("4".parse::<Amount>().unwrap(), Amount::from_cents(400));
        assert_eq!("4.5".parse::<Amount>().unwrap(), Amount::from_cents(450));
        assert_eq!("4.50".parse::<Amount>().unwrap(), Amount::from_cents(450));
        assert_eq!(" 12.05 ".parse::<Amount>().unwrap(), Amount::from_cents(1205));
        assert_eq!("1.230".parse::<Amount>().unwrap(), Amount::from_cents(123));
    }

    #[test]
    fn test_parse_strips_symbol_and_separators() {
        assert_eq!("$1,234.00".parse::<Amount>().unwrap(), Amount::from_cents(123_400));
        assert_eq!("₹150.50".parse::<Amount>().unwrap(), Amount::from_cents(15_050));
        assert_eq!("1,000,000".parse::<Amount>().unwrap(), Amount::from_cents(100_000_000));
    }

    #[test]
    fn test_parse_rejects_misplaced_commas() {
        for bad in ["4,50", "1,,2", ",100", "1234,567", "1,234.5,0"] {
            assert_eq!(
                bad.parse::<Amount>(),
                Err(ValidationError::InvalidAmount(bad.to_string())),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_negative_and_zero() {
        assert_eq!("-2".parse::<Amount>().unwrap(), Amount::from_cents(-200));
        assert_eq!("0".parse::<Amount>().unwrap(), Amount::ZERO);
        assert!(!Amount::ZERO.is_positive());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "abc", "1.234", "1.2.3", "-", ".", "12a", "1e5", "+5", "1_000"] {
            assert_eq!(
                bad.parse::<Amount>(),
                Err(ValidationError::InvalidAmount(bad.trim().to_string())),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_huge_amounts() {
        assert_eq!(
            "90000000000000000".parse::<Amount>(),
            Err(ValidationError::AmountTooLarge("90000000000000000".to_string()))
        );
        assert!("1000000000000".parse::<Amount>().is_ok());
        assert!("1000000000000.01".parse::<Amount>().is_err());
    }

    #[test]
    fn test_sum_of_largest_entries_does_not_overflow() {
        let largest: Amount = "1000000000000".parse().unwrap();
        let total: Amount = vec![largest; 1_000].into_iter().sum();
        assert_eq!(total.to_string(), "1000000000000000.00");
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Amount::from_cents(650).to_string(), "6.50");
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::from_cents(-200).to_string(), "-2.00");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
        assert_eq!("4.5".parse::<Amount>().unwrap().to_string(), "4.50");
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Amount::from_cents(450), Amount::from_cents(200)];
        let total: Amount = amounts.iter().sum();
        assert_eq!(total, Amount::from_cents(650));

        let empty: Vec<Amount> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Amount>(), Amount::ZERO);
    }
}
