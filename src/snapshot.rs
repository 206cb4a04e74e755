use std::collections::BTreeSet;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::accounts::Account;
use crate::entries::{Entry, Side};
use crate::ledger::Ledger;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot is empty")]
    Empty,
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot has {found} accounts, expected {expected}")]
    AccountCount { found: usize, expected: usize },
    #[error("snapshot account order {0} is duplicated or out of range")]
    BadOrder(u32),
    #[error("snapshot entry on account {0} has an invalid side")]
    BadSide(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindRecord {
    Normal,
    Bet,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SideRecord {
    A,
    B,
}

impl From<Side> for SideRecord {
    fn from(side: Side) -> Self {
        match side {
            Side::A => SideRecord::A,
            Side::B => SideRecord::B,
        }
    }
}

impl From<SideRecord> for Side {
    fn from(side: SideRecord) -> Self {
        match side {
            SideRecord::A => Side::A,
            SideRecord::B => Side::B,
        }
    }
}

/// Persisted form of an entry: `{kind, value, side?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub kind: KindRecord,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<SideRecord>,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        match *entry {
            Entry::Normal { value } => EntryRecord {
                kind: KindRecord::Normal,
                value,
                side: None,
            },
            Entry::Bet { stake, side } => EntryRecord {
                kind: KindRecord::Bet,
                value: stake,
                side: Some(side.into()),
            },
        }
    }
}

/// Persisted form of an account. An unset label is written as `""`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub order: u32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

impl From<&Account> for AccountRecord {
    fn from(acc: &Account) -> Self {
        AccountRecord {
            order: acc.order(),
            label: acc.label().unwrap_or_default().to_string(),
            entries: acc.entries().iter().map(EntryRecord::from).collect(),
        }
    }
}

impl AccountRecord {
    fn into_account(self) -> Result<Account, SnapshotError> {
        let order = self.order;
        let entries = self
            .entries
            .into_iter()
            .map(|record| match (record.kind, record.side) {
                (KindRecord::Normal, None) => Ok(Entry::normal(record.value)),
                (KindRecord::Bet, Some(side)) => Ok(Entry::bet(record.value, side.into())),
                _ => Err(SnapshotError::BadSide(order)),
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;
        let label = Some(self.label).filter(|l| !l.is_empty());
        Ok(Account::from_parts(order, label, entries))
    }
}

/// snapshot captures every account, in order
pub fn snapshot(ledger: &Ledger) -> Vec<AccountRecord> {
    ledger
        .accounts()
        .map(|acc| AccountRecord::from(acc.as_ref()))
        .collect()
}

pub fn to_json(ledger: &Ledger) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&snapshot(ledger))
}

/// from_records rebuilds a ledger, requiring exactly the orders 1..=count
pub fn from_records(
    records: Vec<AccountRecord>,
    account_count: usize,
) -> Result<Ledger, SnapshotError> {
    if records.is_empty() {
        return Err(SnapshotError::Empty);
    }
    if records.len() != account_count {
        return Err(SnapshotError::AccountCount {
            found: records.len(),
            expected: account_count,
        });
    }
    let mut seen = BTreeSet::new();
    for record in &records {
        let in_range = record.order >= 1 && record.order as usize <= account_count;
        if !in_range || !seen.insert(record.order) {
            return Err(SnapshotError::BadOrder(record.order));
        }
    }
    let mut accounts = records
        .into_iter()
        .map(AccountRecord::into_account)
        .collect::<Result<Vec<_>, SnapshotError>>()?;
    accounts.sort_by_key(Account::order);
    Ok(Ledger::from_accounts(accounts))
}

pub fn from_json(raw: &str, account_count: usize) -> Result<Ledger, SnapshotError> {
    if raw.trim().is_empty() {
        return Err(SnapshotError::Empty);
    }
    let records: Vec<AccountRecord> = serde_json::from_str(raw)?;
    from_records(records, account_count)
}

/// restore loads a persisted snapshot, falling back to a fresh ledger when
/// it is absent, empty or unusable.
pub fn restore(raw: Option<&str>, account_count: usize) -> Ledger {
    let raw = match raw {
        Some(raw) => raw,
        None => return Ledger::new(account_count),
    };
    match from_json(raw, account_count) {
        Ok(ledger) => ledger,
        Err(SnapshotError::Empty) => Ledger::new(account_count),
        Err(e) => {
            warn!(error = %e, "Discarding unusable snapshot");
            Ledger::new(account_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use proptest::prelude::*;

    fn sample() -> Result<Ledger> {
        Ok(Ledger::new(3)
            .append(1, Entry::bet(100, Side::A), Some("Alice".to_string()))?
            .append(2, Entry::bet(50, Side::B), None)?
            .append(3, Entry::normal(30), None)?
            .append(3, Entry::normal(Decimal::new(-495, 1)), None)?)
    }

    #[test]
    fn test_snapshot_shape() -> Result<()> {
        let value = serde_json::to_value(snapshot(&sample()?))?;
        assert_eq!(
            value[0],
            serde_json::json!({
                "order": 1,
                "label": "Alice",
                "entries": [{"kind": "bet", "value": "100", "side": "A"}]
            })
        );
        assert_eq!(value[1]["label"], "");
        assert_eq!(
            value[2]["entries"],
            serde_json::json!([
                {"kind": "normal", "value": "-49.5"},
                {"kind": "normal", "value": "30"}
            ])
        );
        Ok(())
    }

    #[test]
    fn test_round_trip() -> Result<()> {
        let ledger = sample()?;
        let restored = from_json(&to_json(&ledger)?, 3)?;
        assert_eq!(restored, ledger);
        Ok(())
    }

    #[test]
    fn test_accepts_numeric_values() -> Result<()> {
        let raw = r#"[
            {"order": 2, "label": "", "entries": []},
            {"order": 1, "label": "Zed", "entries": [{"kind": "normal", "value": -12}]}
        ]"#;
        let ledger = from_json(raw, 2)?;
        let acc = ledger.get(1).unwrap();
        assert_eq!(acc.label(), Some("Zed"));
        assert_eq!(acc.entries(), &[Entry::normal(-12)]);
        assert_eq!(ledger.get(2).unwrap().order(), 2);
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_snapshots() {
        assert!(matches!(from_json("", 3), Err(SnapshotError::Empty)));
        assert!(matches!(from_json("[]", 3), Err(SnapshotError::Empty)));
        assert!(matches!(from_json("{", 3), Err(SnapshotError::Json(_))));
        assert!(matches!(
            from_json(r#"[{"order": 1}]"#, 3),
            Err(SnapshotError::AccountCount {
                found: 1,
                expected: 3
            })
        ));
        assert!(matches!(
            from_json(r#"[{"order": 1}, {"order": 1}]"#, 2),
            Err(SnapshotError::BadOrder(1))
        ));
        assert!(matches!(
            from_json(r#"[{"order": 1}, {"order": 3}]"#, 2),
            Err(SnapshotError::BadOrder(3))
        ));
        assert!(matches!(
            from_json(
                r#"[{"order": 1, "entries": [{"kind": "bet", "value": 5}]}]"#,
                1
            ),
            Err(SnapshotError::BadSide(1))
        ));
        assert!(matches!(
            from_json(
                r#"[{"order": 1, "entries": [{"kind": "normal", "value": 5, "side": "A"}]}]"#,
                1
            ),
            Err(SnapshotError::BadSide(1))
        ));
    }

    #[test]
    fn test_restore_falls_back_to_fresh_ledger() {
        assert_eq!(restore(None, 7), Ledger::new(7));
        assert_eq!(restore(Some("  "), 7), Ledger::new(7));
        assert_eq!(restore(Some("not json"), 7), Ledger::new(7));
        assert_eq!(restore(Some("[]"), 10), Ledger::new(10));
    }

    fn entry_strategy() -> impl Strategy<Value = Entry> {
        prop_oneof![
            any::<i64>().prop_map(|value| Entry::normal(value)),
            (any::<i64>(), any::<bool>()).prop_map(|(stake, a)| {
                Entry::bet(stake, if a { Side::A } else { Side::B })
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            ops in prop::collection::vec((1u32..=5, entry_strategy(), prop::option::of("[a-zA-Z ]{1,8}")), 0..40)
        ) {
            let mut ledger = Ledger::new(5);
            for (order, entry, label) in ops {
                ledger = ledger.append(order, entry, label).unwrap();
            }
            let raw = to_json(&ledger).unwrap();
            prop_assert_eq!(from_json(&raw, 5).unwrap(), ledger);
        }
    }
}
