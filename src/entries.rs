use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("unknown side code {0:?}")]
pub struct UnknownSide(pub String);

/// One of the two outcomes a round can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// code returns the single letter an operator types for this side
    pub fn code(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

impl FromStr for Side {
    type Err = UnknownSide;

    fn from_str(s: &str) -> Result<Side, UnknownSide> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Side::A),
            "B" => Ok(Side::B),
            _ => Err(UnknownSide(s.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Normal,
    Bet,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Normal => f.write_str("normal"),
            EntryKind::Bet => f.write_str("bet"),
        }
    }
}

/// A single ledger line. A side only exists on an open wager, so it lives
/// inside the `Bet` variant rather than as an optional field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry {
    Normal { value: Decimal },
    Bet { stake: Decimal, side: Side },
}

impl Entry {
    pub fn normal(value: impl Into<Decimal>) -> Entry {
        Entry::Normal {
            value: value.into(),
        }
    }
    pub fn bet(stake: impl Into<Decimal>, side: Side) -> Entry {
        Entry::Bet {
            stake: stake.into(),
            side,
        }
    }
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Normal { .. } => EntryKind::Normal,
            Entry::Bet { .. } => EntryKind::Bet,
        }
    }
    /// value is the stake of a bet or the realized delta of a normal entry
    pub fn value(&self) -> Decimal {
        match *self {
            Entry::Normal { value } => value,
            Entry::Bet { stake, .. } => stake,
        }
    }
    pub fn side(&self) -> Option<Side> {
        match *self {
            Entry::Normal { .. } => None,
            Entry::Bet { side, .. } => Some(side),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Normal { value } => write!(f, "{}", value),
            Entry::Bet { stake, side } => write!(f, "{} on {}", stake, side),
        }
    }
}
