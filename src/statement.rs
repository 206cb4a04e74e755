use std::io;

use anyhow::Result;
use rust_decimal::prelude::*;
use serde::Serialize;

use crate::accounts::Account;
use crate::ledger::Ledger;

/// One CSV row per account.
#[derive(Debug, Serialize, PartialEq)]
pub struct AccountStatement {
    order: u32,
    label: String,
    entries: usize,
    balance: Decimal,
    open_stake: Option<Decimal>,
}

impl From<&Account> for AccountStatement {
    fn from(acc: &Account) -> Self {
        AccountStatement {
            order: acc.order(),
            label: acc.label().unwrap_or_default().to_string(),
            entries: acc.entries().len(),
            balance: acc.balance(),
            open_stake: acc.open_stake(),
        }
    }
}

/// write_statement emits `order,label,entries,balance,open_stake` for every account
pub fn write_statement<W: io::Write>(out: W, ledger: &Ledger) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for acc in ledger.accounts() {
        writer.serialize(AccountStatement::from(acc.as_ref()))?;
    }
    writer.flush()?;
    Ok(())
}
