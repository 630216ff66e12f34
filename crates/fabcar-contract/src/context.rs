use fabcar_store::LedgerStore;
use uuid::Uuid;

/// Caller-supplied handle scoping one contract invocation.
///
/// The ledger runtime creates one context per transaction; the contract
/// reaches world state only through it.
pub trait TransactionContext {
    /// World-state store visible to this transaction.
    fn stub(&self) -> &dyn LedgerStore;

    /// Identifier of this transaction, used for log correlation.
    fn tx_id(&self) -> &str;
}

/// A [`TransactionContext`] over a borrowed store.
pub struct StoreContext<'a> {
    store: &'a dyn LedgerStore,
    tx_id: String,
}

impl<'a> StoreContext<'a> {
    /// Create a context with a fresh UUID v7 transaction ID.
    pub fn new(store: &'a dyn LedgerStore) -> Self {
        Self::with_tx_id(store, Uuid::now_v7().to_string())
    }

    pub fn with_tx_id(store: &'a dyn LedgerStore, tx_id: impl Into<String>) -> Self {
        Self {
            store,
            tx_id: tx_id.into(),
        }
    }
}

impl TransactionContext for StoreContext<'_> {
    fn stub(&self) -> &dyn LedgerStore {
        self.store
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }
}
