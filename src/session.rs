use tracing::{debug, warn};

use crate::commands::CommandError;
use crate::engine::Engine;
use crate::entries::Side;
use crate::events::{Event, Transition};
use crate::ledger::{Ledger, LedgerError};
use crate::snapshot;
use crate::store::{SnapshotStore, StoreError};

/// What a successful session operation did. `store_error` carries a
/// persistence failure that happened after the in-memory ledger had
/// already moved on.
#[derive(Debug)]
pub struct Outcome {
    pub events: Vec<Event>,
    pub store_error: Option<StoreError>,
}

/// Owns the current ledger for one operator and keeps its store in step.
pub struct Session<'a> {
    engine: Engine,
    store: &'a dyn SnapshotStore,
    ledger: Ledger,
}

impl<'a> Session<'a> {
    /// open restores the ledger from `store`, starting fresh if it cannot
    pub fn open(engine: Engine, store: &'a dyn SnapshotStore) -> Session<'a> {
        let raw = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Unable to load snapshot, starting fresh");
            None
        });
        let ledger = engine.restore(raw.as_deref());
        Session {
            engine,
            store,
            ledger,
        }
    }
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
    pub fn submit(&mut self, raw: &str) -> Result<Outcome, CommandError> {
        match self.engine.execute(&self.ledger, raw) {
            Ok(transition) => Ok(self.commit(transition)),
            Err(e) => {
                if !e.is_noop() {
                    debug!(error = %e, command = raw, "Rejected command");
                }
                Err(e)
            }
        }
    }
    pub fn declare(&mut self, winner: Side) -> Result<Outcome, LedgerError> {
        let transition = self.engine.settle(&self.ledger, winner)?;
        Ok(self.commit(transition))
    }
    /// reset drops the stored snapshot and starts over with empty accounts
    pub fn reset(&mut self) -> Outcome {
        let Transition { ledger, events } = self.engine.reset();
        self.ledger = ledger;
        let store_error = self.store.clear().err();
        if let Some(e) = &store_error {
            warn!(error = %e, "Unable to clear snapshot");
        }
        Outcome {
            events,
            store_error,
        }
    }
    fn commit(&mut self, Transition { ledger, events }: Transition) -> Outcome {
        self.ledger = ledger;
        let store_error = self.save().err();
        if let Some(e) = &store_error {
            warn!(error = %e, "Unable to save snapshot; changes live in memory only");
        }
        Outcome {
            events,
            store_error,
        }
    }
    fn save(&self) -> Result<(), StoreError> {
        let raw = snapshot::to_json(&self.ledger)?;
        self.store.save(&raw)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::Result;

    use super::*;
    use crate::entries::Entry;
    use crate::store::MemoryStore;

    /// Store whose writes can be switched off to simulate a full disk.
    struct FlakyStore {
        inner: MemoryStore,
        failing: Cell<bool>,
    }

    impl SnapshotStore for FlakyStore {
        fn load(&self) -> Result<Option<String>, StoreError> {
            self.inner.load()
        }
        fn save(&self, snapshot: &str) -> Result<(), StoreError> {
            if self.failing.get() {
                return Err(StoreError::Io {
                    path: "flaky".into(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.save(snapshot)
        }
        fn clear(&self) -> Result<(), StoreError> {
            self.inner.clear()
        }
    }

    #[test]
    fn test_session_persists_each_change() -> Result<()> {
        let store = MemoryStore::new();
        let mut session = Session::open(Engine::new(3), &store);
        assert_eq!(session.ledger(), &Ledger::new(3));

        let outcome = session.submit("1:100:A:Alice")?;
        assert!(outcome.store_error.is_none());
        session.submit("2:40")?;

        let reopened = Session::open(Engine::new(3), &store);
        assert_eq!(reopened.ledger(), session.ledger());
        Ok(())
    }

    #[test]
    fn test_session_settles_and_persists() -> Result<()> {
        let store = MemoryStore::new();
        let mut session = Session::open(Engine::new(3), &store);
        session.submit("1:100:A")?;
        let outcome = session.declare(Side::A)?;
        assert_eq!(outcome.events.len(), 2);

        let reopened = Session::open(Engine::new(3), &store);
        assert_eq!(
            reopened.ledger().get(1).unwrap().top(),
            Some(&Entry::normal(-90))
        );
        Ok(())
    }

    #[test]
    fn test_session_rejections_do_not_save() {
        let store = MemoryStore::new();
        let mut session = Session::open(Engine::new(7), &store);
        assert!(session.submit("0:10").is_err());
        assert!(session.submit("").unwrap_err().is_noop());
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(session.ledger(), &Ledger::new(7));
    }

    #[test]
    fn test_session_reset_clears_store() -> Result<()> {
        let store = MemoryStore::new();
        let mut session = Session::open(Engine::new(3), &store);
        session.submit("3:5:B:Lee")?;
        let outcome = session.reset();
        assert_eq!(outcome.events, vec![Event::LedgerReset { accounts: 3 }]);
        assert_eq!(session.ledger(), &Ledger::new(3));
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn test_session_keeps_memory_when_save_fails() -> Result<()> {
        let store = FlakyStore {
            inner: MemoryStore::new(),
            failing: Cell::new(false),
        };
        let mut session = Session::open(Engine::new(2), &store);
        session.submit("1:10")?;

        store.failing.set(true);
        let outcome = session.submit("2:20:b")?;
        assert!(matches!(outcome.store_error, Some(StoreError::Io { .. })));
        assert_eq!(
            session.ledger().get(2).unwrap().top(),
            Some(&Entry::bet(20, Side::B))
        );

        // the store still holds the last good snapshot
        let stale = Session::open(Engine::new(2), &store);
        assert!(stale.ledger().get(2).unwrap().entries().is_empty());
        assert_eq!(stale.ledger().get(1).unwrap().top(), Some(&Entry::normal(10)));
        Ok(())
    }

    #[test]
    fn test_session_ignores_corrupt_snapshot() -> Result<()> {
        let store = MemoryStore::new();
        store.save("{ not a ledger")?;
        let session = Session::open(Engine::new(7), &store);
        assert_eq!(session.ledger(), &Ledger::new(7));
        Ok(())
    }
}
