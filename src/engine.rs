use tracing::debug;

use crate::commands::{self, CommandError, EntryCommand};
use crate::entries::Side;
use crate::events::{Event, Transition};
use crate::ledger::{Ledger, LedgerError};
use crate::settlement;
use crate::snapshot;

/// Stateless entry point into the ledger. Every operation takes the current
/// ledger by reference and hands back a new one; the caller owns whichever
/// value is current.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    account_count: usize,
}

impl Engine {
    pub fn new(account_count: usize) -> Engine {
        Engine { account_count }
    }
    pub fn account_count(&self) -> usize {
        self.account_count
    }
    /// execute parses `raw` and records the resulting entry
    pub fn execute(&self, ledger: &Ledger, raw: &str) -> Result<Transition, CommandError> {
        let command = commands::parse(raw, self.account_count)?;
        Ok(self.apply(ledger, command)?)
    }
    pub fn apply(&self, ledger: &Ledger, command: EntryCommand) -> Result<Transition, LedgerError> {
        let EntryCommand {
            order,
            entry,
            label,
        } = command;
        let next = ledger.append(order, entry, label.clone())?;
        debug!(order, kind = %entry.kind(), value = %entry.value(), "Appended entry");

        let mut events = vec![Event::EntryAppended {
            order,
            kind: entry.kind(),
            value: entry.value(),
        }];
        if let Some(label) = label {
            events.push(Event::LabelChanged { order, label });
        }
        Ok(Transition {
            ledger: next,
            events,
        })
    }
    pub fn settle(&self, ledger: &Ledger, winner: Side) -> Result<Transition, LedgerError> {
        settlement::settle(ledger, winner)
    }
    pub fn reset(&self) -> Transition {
        Transition {
            ledger: Ledger::new(self.account_count),
            events: vec![Event::LedgerReset {
                accounts: self.account_count,
            }],
        }
    }
    /// restore rebuilds the ledger from a stored snapshot, or starts fresh
    pub fn restore(&self, raw: Option<&str>) -> Ledger {
        snapshot::restore(raw, self.account_count)
    }
}
