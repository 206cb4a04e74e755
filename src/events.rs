use std::fmt;

use rust_decimal::prelude::*;

use crate::entries::{EntryKind, Side};
use crate::ledger::Ledger;

/// Something a transition did, for the caller to render or log.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    EntryAppended {
        order: u32,
        kind: EntryKind,
        value: Decimal,
    },
    LabelChanged {
        order: u32,
        label: String,
    },
    AccountSettled {
        order: u32,
        stake: Decimal,
        side: Side,
        delta: Decimal,
    },
    RoundSettled {
        winner: Side,
        settled: usize,
    },
    LedgerReset {
        accounts: usize,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::EntryAppended { order, kind, value } => {
                write!(f, "account {}: {} {}", order, kind, value)
            }
            Event::LabelChanged { order, label } => {
                write!(f, "account {}: label set to {:?}", order, label)
            }
            Event::AccountSettled {
                order,
                stake,
                side,
                delta,
            } => write!(
                f,
                "account {}: bet {} on {} settled at {}",
                order, stake, side, delta
            ),
            Event::RoundSettled { winner, settled } => {
                write!(f, "round won by {}: {} bets settled", winner, settled)
            }
            Event::LedgerReset { accounts } => write!(f, "ledger reset to {} accounts", accounts),
        }
    }
}

/// The new ledger value produced by an engine operation.
#[derive(Debug, Clone)]
pub struct Transition {
    pub ledger: Ledger,
    pub events: Vec<Event>,
}
