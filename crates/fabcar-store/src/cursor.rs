//! Scoped range cursors.
//!
//! A backend hands out a [`StateCursor`]; callers only ever see it wrapped in
//! a [`RangeCursor`], which guarantees the backend cursor is closed exactly
//! once whether iteration finishes, fails, or is abandoned early.

use tracing::warn;

use crate::error::StoreResult;

/// One world-state entry yielded by a range scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Backend side of a range scan.
///
/// Implementations yield entries in ascending key order. `close` releases
/// whatever the cursor holds; [`RangeCursor`] calls it exactly once.
pub trait StateCursor: Send {
    /// Next entry, `None` when the range is exhausted.
    fn next_entry(&mut self) -> Option<StoreResult<KeyValue>>;

    /// Release the cursor.
    fn close(&mut self) -> StoreResult<()>;
}

/// Single-pass iterator over a key range that owns its backend cursor.
///
/// Dropping the cursor releases it. Call [`RangeCursor::close`] instead to
/// observe a release failure.
pub struct RangeCursor<'a> {
    inner: Box<dyn StateCursor + 'a>,
    closed: bool,
}

impl<'a> RangeCursor<'a> {
    pub fn new(inner: Box<dyn StateCursor + 'a>) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Release the cursor and report any failure from the backend.
    pub fn close(mut self) -> StoreResult<()> {
        self.closed = true;
        self.inner.close()
    }
}

impl Iterator for RangeCursor<'_> {
    type Item = StoreResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.inner.next_entry()
    }
}

impl Drop for RangeCursor<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.inner.close() {
            warn!(error = %e, "failed to release range cursor");
        }
    }
}

impl std::fmt::Debug for RangeCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeCursor")
            .field("closed", &self.closed)
            .finish()
    }
}
