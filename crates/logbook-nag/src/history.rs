//! Capacity-bounded reminder history, newest first.

use logbook_core::ReminderEvent;
use logbook_store::KvFile;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Maximum number of events kept.
pub const HISTORY_CAPACITY: usize = 30;

/// Key under which the history array is stored.
pub const HISTORY_KEY: &str = "nag_history";

/// Durable slot holding the serialized history.
pub trait HistoryStorage: Send {
    fn load(&self) -> anyhow::Result<Option<Value>>;
    fn save(&self, records: Value) -> anyhow::Result<()>;
}

/// History stored under one key of a [`KvFile`].
pub struct KvHistoryStorage {
    kv: KvFile,
}

impl KvHistoryStorage {
    pub fn new(kv: KvFile) -> Self {
        Self { kv }
    }
}

impl HistoryStorage for KvHistoryStorage {
    fn load(&self) -> anyhow::Result<Option<Value>> {
        self.kv.get(HISTORY_KEY)
    }

    fn save(&self, records: Value) -> anyhow::Result<()> {
        self.kv.set(HISTORY_KEY, records)
    }
}

/// In-memory storage shared between clones (for testing).
#[derive(Clone, Default)]
pub struct MemoryHistoryStorage {
    slot: Arc<Mutex<Option<Value>>>,
    fail_writes: bool,
}

impl MemoryHistoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: Value) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(value))),
            fail_writes: false,
        }
    }

    /// A storage whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> Option<Value> {
        self.slot.lock().unwrap().clone()
    }
}

impl HistoryStorage for MemoryHistoryStorage {
    fn load(&self) -> anyhow::Result<Option<Value>> {
        Ok(self.value())
    }

    fn save(&self, records: Value) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("storage is read-only");
        }
        *self.slot.lock().unwrap() = Some(records);
        Ok(())
    }
}

pub struct HistoryLog {
    events: Vec<ReminderEvent>,
    storage: Box<dyn HistoryStorage>,
}

impl HistoryLog {
    /// Load history from storage. Missing or undecodable data starts empty;
    /// there is no partial recovery.
    pub fn load(storage: impl HistoryStorage + 'static) -> Self {
        let events = match storage.load() {
            Ok(Some(value)) => match serde_json::from_value::<Vec<ReminderEvent>>(value) {
                Ok(mut events) => {
                    events.truncate(HISTORY_CAPACITY);
                    events
                }
                Err(e) => {
                    warn!(error = %e, "reminder history corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "reminder history unreadable, starting empty");
                Vec::new()
            }
        };
        Self {
            events,
            storage: Box::new(storage),
        }
    }

    /// Prepend an event, evict the oldest beyond capacity, and persist.
    /// Persistence failures are logged; the in-memory history stays correct.
    pub fn record(&mut self, event: ReminderEvent) {
        self.events.insert(0, event);
        self.events.truncate(HISTORY_CAPACITY);
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to persist reminder history");
        }
    }

    fn persist(&self) -> anyhow::Result<()> {
        let value = serde_json::to_value(&self.events)?;
        self.storage.save(value)
    }

    /// Events, newest first.
    pub fn events(&self) -> &[ReminderEvent] {
        &self.events
    }

    pub fn latest(&self) -> Option<&ReminderEvent> {
        self.events.first()
    }
}
