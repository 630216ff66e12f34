use fabcar_events::EventError;
use fabcar_store::StoreError;
use fabcar_types::CodecError;

/// Errors produced by contract operations.
///
/// Every variant that touches world state names the operation and the key
/// involved. [`ContractError::Emit`] is the only failure raised after the
/// car was already written; see [`ContractError::is_persisted`].
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("car {0} does not exist")]
    NotFound(String),

    #[error("{op}: failed to encode car {asset_id}: {source}")]
    Encode {
        op: &'static str,
        asset_id: String,
        #[source]
        source: CodecError,
    },

    #[error("{op}: failed to decode car at key {key}: {source}")]
    Decode {
        op: &'static str,
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("{op}: world state failure at key {key}: {source}")]
    Persistence {
        op: &'static str,
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("{op}: car {asset_id} was stored but event {event} failed: {source}")]
    Emit {
        op: &'static str,
        asset_id: String,
        event: &'static str,
        #[source]
        source: EventError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ContractError {
    /// Whether the failed operation had already committed its write.
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Emit { .. })
    }

    /// The world-state key involved in the failure, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::NotFound(key) => Some(key.as_str()),
            Self::Encode { asset_id, .. } | Self::Emit { asset_id, .. } => Some(asset_id.as_str()),
            Self::Decode { key, .. } | Self::Persistence { key, .. } => Some(key.as_str()),
            Self::InvalidArgument(_) | Self::Config(_) => None,
        }
    }
}

/// Result alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;
