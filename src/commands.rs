use rust_decimal::prelude::*;
use thiserror::Error;

use crate::entries::{Entry, Side};
use crate::ledger::LedgerError;

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("malformed command: {0}")]
    Malformed(#[from] Malformed),
    /// A validated command still missed the ledger; the engine and ledger
    /// disagree on the account count.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl CommandError {
    /// is_noop is true for input that should be ignored rather than reported
    pub fn is_noop(&self) -> bool {
        matches!(self, CommandError::Empty)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum Malformed {
    #[error("missing account number")]
    MissingOrder,
    #[error("account number {0:?} is not an integer")]
    InvalidOrder(String),
    #[error("account {order} is out of range 1..={count}")]
    OrderOutOfRange { order: i64, count: usize },
    #[error("missing amount")]
    MissingAmount,
    #[error("amount {0:?} is not an integer")]
    InvalidAmount(String),
    #[error("amount must not be zero")]
    ZeroAmount,
}

/// A validated request to record one entry against one account.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCommand {
    pub order: u32,
    pub entry: Entry,
    pub label: Option<String>,
}

/// parse reads `<order>:<amount>[:<side>[:<label>]]`.
///
/// A recognised side turns the entry into a bet on that side; anything else
/// in that slot records a normal entry. The label is everything after the
/// third colon, so it may itself contain colons. Blank input yields
/// `CommandError::Empty`.
pub fn parse(raw: &str, account_count: usize) -> Result<EntryCommand, CommandError> {
    if raw.trim().is_empty() {
        return Err(CommandError::Empty);
    }
    let mut tokens = raw.splitn(4, ':').map(str::trim);

    let order = match tokens.next() {
        Some(t) if !t.is_empty() => t
            .parse::<i64>()
            .map_err(|_| Malformed::InvalidOrder(t.to_string()))?,
        _ => return Err(Malformed::MissingOrder.into()),
    };
    let order = u32::try_from(order)
        .ok()
        .filter(|o| *o >= 1 && (*o as usize) <= account_count)
        .ok_or(Malformed::OrderOutOfRange {
            order,
            count: account_count,
        })?;

    let amount = match tokens.next() {
        Some(t) if !t.is_empty() => t
            .parse::<i64>()
            .map_err(|_| Malformed::InvalidAmount(t.to_string()))?,
        _ => return Err(Malformed::MissingAmount.into()),
    };
    if amount == 0 {
        return Err(Malformed::ZeroAmount.into());
    }
    let value = Decimal::from(amount);

    let entry = match tokens.next().and_then(|t| t.parse::<Side>().ok()) {
        Some(side) => Entry::bet(value, side),
        None => Entry::normal(value),
    };
    let label = tokens
        .next()
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Ok(EntryCommand {
        order,
        entry,
        label,
    })
}
