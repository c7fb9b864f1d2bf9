//! Durable per-identity warning counters.
//!
//! The ledger is authoritative in memory; every mutation is followed by a
//! best-effort persist of the whole mapping. A failed persist is logged,
//! leaves the ledger marked dirty, and the next mutation writes the current
//! state again, so nothing is lost as long as the store comes back.

use std::collections::HashMap;

use redis::Commands;
use serde::{Deserialize, Serialize};

use crate::config::LEDGER_KEY;
use crate::errors::PersistenceError;
use crate::identity::Identity;

/// One sender's accumulated warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarningRecord {
    pub count: u32,
    pub last_reason: String,
}

/// Persistence backend for the ledger. The whole mapping is read at startup
/// and written after each mutation.
pub trait LedgerStore: Send {
    fn load(&mut self) -> Result<HashMap<Identity, WarningRecord>, PersistenceError>;
    fn save(&mut self, records: &HashMap<Identity, WarningRecord>) -> Result<(), PersistenceError>;
}

/// Warning ledger keyed by normalized identity.
pub struct WarningLedger {
    records: HashMap<Identity, WarningRecord>,
    store: Box<dyn LedgerStore>,
    dirty: bool,
}

impl WarningLedger {
    /// Build a ledger over `store`, loading whatever it already holds. A
    /// load failure is non-fatal: the ledger starts empty and is persisted
    /// on the next mutation.
    pub fn open(mut store: Box<dyn LedgerStore>) -> Self {
        let records = match store.load() {
            Ok(records) => records,
            Err(e) => {
                log::warn!("ledger load failed, starting empty: {e}");
                HashMap::new()
            }
        };
        WarningLedger {
            records,
            store,
            dirty: false,
        }
    }

    /// Increment (or initialize) the record for `identity` and persist.
    /// Returns the new count.
    pub fn add_warning(&mut self, identity: &Identity, reason: &str) -> u32 {
        let record = self.records.entry(identity.clone()).or_default();
        record.count += 1;
        record.last_reason = reason.to_string();
        let count = record.count;
        self.persist();
        count
    }

    /// Clear every record and persist the empty ledger.
    pub fn reset(&mut self) {
        self.records.clear();
        self.persist();
    }

    pub fn count_for(&self, identity: &Identity) -> u32 {
        self.records.get(identity).map(|r| r.count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flush unpersisted state; used at shutdown.
    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        if self.dirty {
            self.store.save(&self.records)?;
            self.dirty = false;
        }
        Ok(())
    }

    fn persist(&mut self) {
        match self.store.save(&self.records) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                // In-memory increment already applied; retried next mutation.
                self.dirty = true;
                log::warn!("ledger persist failed, will retry: {e}");
            }
        }
    }
}

/// Stores the ledger as one JSON blob under [`LEDGER_KEY`].
pub struct RedisLedgerStore {
    client: redis::Client,
    key: String,
}

impl RedisLedgerStore {
    pub fn new(redis_url: &str) -> Result<Self, PersistenceError> {
        let client = redis::Client::open(redis_url)?;
        Ok(RedisLedgerStore {
            client,
            key: LEDGER_KEY.to_string(),
        })
    }
}

impl LedgerStore for RedisLedgerStore {
    fn load(&mut self) -> Result<HashMap<Identity, WarningRecord>, PersistenceError> {
        let mut conn = self.client.get_connection()?;
        let blob: Option<String> = conn.get(&self.key)?;
        match blob {
            Some(blob) => {
                serde_json::from_str(&blob).map_err(|e| PersistenceError::Decode(e.to_string()))
            }
            None => Ok(HashMap::new()),
        }
    }

    fn save(&mut self, records: &HashMap<Identity, WarningRecord>) -> Result<(), PersistenceError> {
        let blob =
            serde_json::to_string(records).map_err(|e| PersistenceError::Encode(e.to_string()))?;
        let mut conn = self.client.get_connection()?;
        conn.set::<_, _, ()>(&self.key, blob)?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs. `save` snapshots the mapping so a
/// reload sees exactly what was persisted.
#[derive(Default)]
pub struct MemoryLedgerStore {
    pub persisted: HashMap<Identity, WarningRecord>,
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&mut self) -> Result<HashMap<Identity, WarningRecord>, PersistenceError> {
        Ok(self.persisted.clone())
    }

    fn save(&mut self, records: &HashMap<Identity, WarningRecord>) -> Result<(), PersistenceError> {
        self.persisted = records.clone();
        Ok(())
    }
}
