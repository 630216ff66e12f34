use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::CodecResult;

/// A car asset held in world state.
///
/// `asset_id` doubles as the world-state key, so at most one `Car` exists per
/// ID: writing a car whose ID is already present replaces the old record.
/// The remaining fields are free-form strings.
///
/// Field order matters for the encoded form and must not be rearranged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Car {
    #[serde(rename = "assetID")]
    pub asset_id: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub owner: String,
}

impl Car {
    pub fn new(
        asset_id: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        color: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            make: make.into(),
            model: model.into(),
            color: color.into(),
            owner: owner.into(),
        }
    }

    /// The world-state key this car is stored under.
    pub fn key(&self) -> &str {
        &self.asset_id
    }

    /// Encode this car into its world-state bytes.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        codec::encode(self)
    }

    /// Decode a car from world-state bytes.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        codec::decode(bytes)
    }
}

impl std::fmt::Display for Car {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} ({}) owned by {}",
            self.asset_id, self.color, self.make, self.model, self.owner
        )
    }
}
