use std::rc::Rc;

use thiserror::Error;

use crate::accounts::Account;
use crate::entries::Entry;

#[derive(Error, Debug, PartialEq)]
pub enum LedgerError {
    #[error("account {order} does not exist (ledger has {count} accounts)")]
    AccountNotFound { order: u32, count: usize },
    #[error("settling account {order} overflowed")]
    Overflow { order: u32 },
}

/// The full set of cards, indexed by `order - 1`.
///
/// Accounts sit behind `Rc` so a transition only allocates the accounts it
/// touches; every other slot is shared with the previous ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    accounts: Vec<Rc<Account>>,
}

impl Ledger {
    /// new returns `count` empty accounts ordered 1..=count
    pub fn new(count: usize) -> Ledger {
        Ledger {
            accounts: (1..=count as u32)
                .map(|order| Rc::new(Account::new(order)))
                .collect(),
        }
    }
    /// from_accounts expects accounts already validated to be ordered 1..=n
    pub(crate) fn from_accounts(accounts: Vec<Account>) -> Ledger {
        Ledger {
            accounts: accounts.into_iter().map(Rc::new).collect(),
        }
    }
    pub(crate) fn from_shared(accounts: Vec<Rc<Account>>) -> Ledger {
        Ledger { accounts }
    }
    pub fn len(&self) -> usize {
        self.accounts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
    pub fn get(&self, order: u32) -> Option<&Rc<Account>> {
        let idx = (order as usize).checked_sub(1)?;
        self.accounts.get(idx)
    }
    pub fn accounts(&self) -> impl Iterator<Item = &Rc<Account>> {
        self.accounts.iter()
    }
    /// append returns a ledger where only the account at `order` is replaced
    pub fn append(
        &self,
        order: u32,
        entry: Entry,
        label: Option<String>,
    ) -> Result<Ledger, LedgerError> {
        let idx = (order as usize)
            .checked_sub(1)
            .filter(|idx| *idx < self.accounts.len())
            .ok_or(LedgerError::AccountNotFound {
                order,
                count: self.accounts.len(),
            })?;
        let mut accounts = self.accounts.clone();
        accounts[idx] = Rc::new(self.accounts[idx].with_entry(entry, label));
        Ok(Ledger { accounts })
    }
}
