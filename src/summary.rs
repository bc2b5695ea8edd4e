// Aggregations over expense records
// Pure functions, never touch the store

use crate::amount::Amount;
use crate::record::{Month, Record};
use indexmap::{Equivalent, IndexMap};
use std::hash::Hash;

/// Summed amounts per key, in order of each key's first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown<K: Hash + Eq> {
    totals: IndexMap<K, Amount>,
}

impl<K: Hash + Eq> Default for Breakdown<K> {
    fn default() -> Self {
        Breakdown {
            totals: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> Breakdown<K> {
    fn add(&mut self, key: K, amount: Amount) {
        *self.totals.entry(key).or_default() += amount;
    }

    pub fn get<Q>(&self, key: &Q) -> Option<Amount>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.totals.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, Amount)> + '_ {
        self.totals.iter().map(|(key, amount)| (key, *amount))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum over all keys. Equals [`total`] of the records it was built from.
    pub fn total(&self) -> Amount {
        self.totals.values().sum()
    }

    /// Largest amount first; ties keep first-occurrence order.
    pub fn sorted_by_amount(&self) -> Vec<(&K, Amount)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    pub fn sorted_by_key(&self) -> Vec<(&K, Amount)>
    where
        K: Ord,
    {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Sum of all amounts, zero for no records.
pub fn total(records: &[Record]) -> Amount {
    records.iter().map(Record::amount).sum()
}

pub fn by_category(records: &[Record]) -> Breakdown<String> {
    let mut breakdown = Breakdown::default();
    for record in records {
        breakdown.add(record.category().to_string(), record.amount());
    }
    breakdown
}

/// Grouped by the month of each record's date; file order does not matter.
pub fn by_month(records: &[Record]) -> Breakdown<Month> {
    let mut breakdown = Breakdown::default();
    for record in records {
        breakdown.add(record.month(), record.amount());
    }
    breakdown
}
