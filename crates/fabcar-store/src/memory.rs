use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use fabcar_events::{ChaincodeEvent, EventBus, EventEmitter, EventResult};
use tracing::debug;

use crate::cursor::{KeyValue, RangeCursor, StateCursor};
use crate::error::{StoreError, StoreResult};
use crate::traits::LedgerStore;

/// Injected failures, used to exercise error paths of callers.
#[derive(Debug, Default)]
struct Faults {
    put_keys: HashSet<String>,
    reject_scans: bool,
    cursor_fail_after: Option<usize>,
    cursor_fail_close: bool,
    reject_batches: bool,
}

/// In-memory, `BTreeMap`-based world-state store.
///
/// Intended for tests, local demos and embedding. State sits behind a
/// `RwLock`; range scans take a snapshot of the requested range when opened,
/// so concurrent writers never disturb an open cursor. Events are forwarded
/// to an [`EventEmitter`]; stores built with [`InMemoryLedgerStore::new`] own
/// an [`EventBus`] reachable through [`InMemoryLedgerStore::event_bus`].
pub struct InMemoryLedgerStore {
    state: RwLock<BTreeMap<String, Vec<u8>>>,
    emitter: Arc<dyn EventEmitter>,
    bus: Option<Arc<EventBus>>,
    faults: RwLock<Faults>,
    cursors_opened: AtomicUsize,
    cursors_open: AtomicUsize,
}

impl InMemoryLedgerStore {
    /// Create an empty store with its own event bus.
    pub fn new() -> Self {
        Self::with_event_bus(Arc::new(EventBus::new()))
    }

    /// Create an empty store that emits onto `bus`.
    pub fn with_event_bus(bus: Arc<EventBus>) -> Self {
        let mut store = Self::with_emitter(bus.clone());
        store.bus = Some(bus);
        store
    }

    /// Create an empty store that forwards events to `emitter`.
    pub fn with_emitter(emitter: Arc<dyn EventEmitter>) -> Self {
        Self::from_snapshot(BTreeMap::new(), emitter)
    }

    /// Create a store pre-populated with `entries`.
    pub fn from_snapshot(entries: BTreeMap<String, Vec<u8>>, emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            state: RwLock::new(entries),
            emitter,
            bus: None,
            faults: RwLock::new(Faults::default()),
            cursors_opened: AtomicUsize::new(0),
            cursors_open: AtomicUsize::new(0),
        }
    }

    /// The event bus this store emits onto, if it was built with one.
    pub fn event_bus(&self) -> Option<&Arc<EventBus>> {
        self.bus.as_ref()
    }

    /// Copy of every stored entry, in key order.
    pub fn snapshot(&self) -> StoreResult<BTreeMap<String, Vec<u8>>> {
        Ok(self.read_state()?.clone())
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.state.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursors opened but not yet released.
    pub fn open_cursors(&self) -> usize {
        self.cursors_open.load(Ordering::SeqCst)
    }

    /// Total cursors opened over the store's lifetime.
    pub fn cursors_opened(&self) -> usize {
        self.cursors_opened.load(Ordering::SeqCst)
    }

    /// Make every subsequent put on `key` fail.
    pub fn fail_put_on(&self, key: impl Into<String>) {
        self.faults_mut().put_keys.insert(key.into());
    }

    /// Make every subsequent range scan fail to open.
    pub fn fail_range_scans(&self) {
        self.faults_mut().reject_scans = true;
    }

    /// Make subsequently opened cursors fail after yielding `n` entries.
    pub fn fail_cursor_after(&self, n: usize) {
        self.faults_mut().cursor_fail_after = Some(n);
    }

    /// Make subsequently opened cursors fail when released.
    ///
    /// The cursor still counts as released; only the error is reported.
    pub fn fail_cursor_close(&self) {
        self.faults_mut().cursor_fail_close = true;
    }

    /// Make every subsequent batch write fail before touching state.
    pub fn fail_batch_writes(&self) {
        self.faults_mut().reject_batches = true;
    }

    /// Remove all injected failures.
    pub fn clear_faults(&self) {
        *self.faults_mut() = Faults::default();
    }

    fn faults_mut(&self) -> std::sync::RwLockWriteGuard<'_, Faults> {
        self.faults.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read_state(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("state lock poisoned".into()))
    }

    fn write_state(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("state lock poisoned".into()))
    }

    fn check_put(&self, key: &str) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let faults = self.faults.read().unwrap_or_else(|e| e.into_inner());
        if faults.put_keys.contains(key) {
            return Err(StoreError::WriteRejected {
                key: key.to_string(),
                reason: "injected failure".into(),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        Ok(self.read_state()?.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.check_put(key)?;
        self.write_state()?.insert(key.to_string(), value.to_vec());
        debug!(key, len = value.len(), "state written");
        Ok(())
    }

    fn put_state_batch(&self, entries: &[(String, Vec<u8>)]) -> StoreResult<()> {
        if self.faults.read().unwrap_or_else(|e| e.into_inner()).reject_batches {
            return Err(StoreError::Backend("injected batch failure".into()));
        }
        // Validate everything before touching state so the batch is all-or-nothing.
        for (key, _) in entries {
            self.check_put(key)?;
        }
        let mut state = self.write_state()?;
        for (key, value) in entries {
            state.insert(key.clone(), value.clone());
        }
        debug!(count = entries.len(), "state batch written");
        Ok(())
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> StoreResult<RangeCursor<'_>> {
        if !start.is_empty() && !end.is_empty() && start > end {
            return Err(StoreError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        let (fail_after, fail_close) = {
            let faults = self.faults.read().unwrap_or_else(|e| e.into_inner());
            if faults.reject_scans {
                return Err(StoreError::ScanRejected("injected failure".into()));
            }
            (faults.cursor_fail_after, faults.cursor_fail_close)
        };

        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        let entries: Vec<KeyValue> = self
            .read_state()?
            .range::<str, _>((lower, upper))
            .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
            .collect();

        self.cursors_opened.fetch_add(1, Ordering::SeqCst);
        self.cursors_open.fetch_add(1, Ordering::SeqCst);
        debug!(start, end, entries = entries.len(), "range cursor opened");
        Ok(RangeCursor::new(Box::new(MemoryCursor {
            entries: entries.into_iter(),
            position: 0,
            fail_after,
            fail_close,
            open: &self.cursors_open,
        })))
    }

    fn set_event(&self, name: &str, payload: &[u8]) -> EventResult<()> {
        self.emitter.emit(ChaincodeEvent::new(name, payload))
    }
}

impl std::fmt::Debug for InMemoryLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedgerStore")
            .field("key_count", &self.len())
            .field("open_cursors", &self.open_cursors())
            .finish()
    }
}

/// Cursor over a snapshot of a key range.
struct MemoryCursor<'a> {
    entries: std::vec::IntoIter<KeyValue>,
    position: usize,
    fail_after: Option<usize>,
    fail_close: bool,
    open: &'a AtomicUsize,
}

impl StateCursor for MemoryCursor<'_> {
    fn next_entry(&mut self) -> Option<StoreResult<KeyValue>> {
        if self.fail_after == Some(self.position) {
            // Fail once, then behave as exhausted.
            self.fail_after = None;
            self.entries = Vec::new().into_iter();
            return Some(Err(StoreError::Cursor {
                position: self.position,
                reason: "injected failure".into(),
            }));
        }
        let entry = self.entries.next()?;
        self.position += 1;
        Some(Ok(entry))
    }

    fn close(&mut self) -> StoreResult<()> {
        self.open.fetch_sub(1, Ordering::SeqCst);
        debug!(yielded = self.position, "range cursor closed");
        if self.fail_close {
            return Err(StoreError::Cursor {
                position: self.position,
                reason: "injected release failure".into(),
            });
        }
        Ok(())
    }
}
