use thiserror::Error;

/// Errors produced while encoding or decoding a car record.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The record could not be serialized.
    #[error("failed to encode car {asset_id}: {source}")]
    Encode {
        asset_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The bytes are not a valid encoded car (malformed JSON, a missing
    /// field, or a field of the wrong type).
    #[error("failed to decode car: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
