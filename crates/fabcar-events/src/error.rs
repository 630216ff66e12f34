/// Errors produced while emitting chaincode events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// The bus has been closed and cannot accept events.
    #[error("event bus is closed")]
    Closed,

    /// Event names must be non-empty.
    #[error("event name must not be empty")]
    EmptyName,
}

/// Convenience alias used throughout the events crate.
pub type EventResult<T> = std::result::Result<T, EventError>;
