//! World-state codec for [`Car`] records.
//!
//! Cars are stored as compact JSON objects with field-named keys. Encoding is
//! deterministic: the same car always yields the same bytes, with keys in
//! declaration order. Decoding is strict about the five known fields (each
//! must be present and a string) and ignores any extra keys.

use crate::car::Car;
use crate::error::{CodecError, CodecResult};

/// Encode a car into its world-state bytes.
pub fn encode(car: &Car) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(car).map_err(|source| CodecError::Encode {
        asset_id: car.asset_id.clone(),
        source,
    })
}

/// Decode world-state bytes back into a car.
pub fn decode(bytes: &[u8]) -> CodecResult<Car> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
