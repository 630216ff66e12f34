//! World-state storage for the fabcar ledger.
//!
//! The ledger's persistent state lives in an external key-value store owned
//! by the surrounding ledger runtime. This crate defines the boundary the
//! asset contract consumes, [`LedgerStore`], and ships an in-memory backend
//! for tests, demos and embedding.
//!
//! # Storage Backends
//!
//! - [`InMemoryLedgerStore`] -- `BTreeMap`-based store with fault injection
//!
//! # Design Rules
//!
//! 1. Keys are non-empty UTF-8 strings; values are opaque bytes.
//! 2. A put on an existing key overwrites it silently.
//! 3. Range scans yield entries in ascending key order.
//! 4. Every range cursor is released exactly once, on every exit path.
//! 5. Events are emitted through the store but never stored in it.
//! 6. All backend errors are propagated, never silently ignored.

pub mod cursor;
pub mod error;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use cursor::{KeyValue, RangeCursor, StateCursor};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryLedgerStore;
pub use snapshot::{load_snapshot, save_snapshot};
pub use traits::LedgerStore;
