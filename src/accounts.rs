use rust_decimal::prelude::*;

use crate::entries::Entry;

/// One numbered card. Entries are kept newest-first.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    order: u32,
    label: Option<String>,
    entries: Vec<Entry>,
}

impl Account {
    /// new creates an empty, unlabeled account
    pub fn new(order: u32) -> Account {
        Account {
            order,
            label: None,
            entries: Vec::new(),
        }
    }
    pub(crate) fn from_parts(order: u32, label: Option<String>, entries: Vec<Entry>) -> Account {
        Account {
            order,
            label,
            entries,
        }
    }
    pub fn order(&self) -> u32 {
        self.order
    }
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
    /// top is the most recently recorded entry
    pub fn top(&self) -> Option<&Entry> {
        self.entries.first()
    }
    /// balance sums the realized (normal) entries; open stakes are excluded
    pub fn balance(&self) -> Decimal {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Normal { value } => Some(*value),
                Entry::Bet { .. } => None,
            })
            .sum()
    }
    /// open_stake is the stake of the top entry if it is an unsettled bet
    pub fn open_stake(&self) -> Option<Decimal> {
        match self.top() {
            Some(Entry::Bet { stake, .. }) => Some(*stake),
            _ => None,
        }
    }
    /// with_entry returns a copy with `entry` on top. A `Some` label replaces
    /// the stored one; `None` keeps it.
    pub fn with_entry(&self, entry: Entry, label: Option<String>) -> Account {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(entry);
        entries.extend_from_slice(&self.entries);
        Account {
            order: self.order,
            label: label.or_else(|| self.label.clone()),
            entries,
        }
    }
}
