use fabcar_events::EventResult;

use crate::cursor::RangeCursor;
use crate::error::StoreResult;

/// World-state key-value store consumed by the asset contract.
///
/// All implementations must satisfy these invariants:
/// - `put_state` upserts: an existing value is overwritten without error.
/// - `get_state_by_range` yields entries in ascending key order. An empty
///   `start` means "from the first key", an empty `end` means "through the
///   last key"; otherwise `start` is inclusive and `end` exclusive.
/// - Returned cursors are released exactly once (see [`RangeCursor`]).
/// - `set_event` never touches stored state, and an event failure never
///   undoes a put that already succeeded.
pub trait LedgerStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any existing value.
    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Open a cursor over `[start, end)` in ascending key order.
    fn get_state_by_range(&self, start: &str, end: &str) -> StoreResult<RangeCursor<'_>>;

    /// Raise a named event alongside the current operation.
    fn set_event(&self, name: &str, payload: &[u8]) -> EventResult<()>;

    /// Write several entries.
    ///
    /// Default implementation calls `put_state()` for each entry and stops
    /// at the first failure, leaving earlier writes in place. Backends may
    /// override it to be all-or-nothing.
    fn put_state_batch(&self, entries: &[(String, Vec<u8>)]) -> StoreResult<()> {
        entries
            .iter()
            .try_for_each(|(key, value)| self.put_state(key, value))
    }
}
