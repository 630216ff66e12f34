use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EventResult;

/// Name of the event raised after a car is created.
pub const CAR_CREATED: &str = "CarCreated";

/// A single named notification with an opaque payload.
///
/// The payload carries no envelope; for [`CAR_CREATED`] it is the raw bytes
/// of the car's asset ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    /// Event name, e.g. `CarCreated`.
    pub name: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
    /// Wall-clock time the event was raised.
    pub emitted_at: DateTime<Utc>,
}

impl ChaincodeEvent {
    pub fn new(name: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            emitted_at: Utc::now(),
        }
    }

    /// Payload as UTF-8 text, if it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Hex rendering of the payload, for logs of non-text payloads.
    pub fn payload_hex(&self) -> String {
        hex::encode(&self.payload)
    }
}

impl std::fmt::Display for ChaincodeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.payload_str() {
            Some(text) => write!(f, "{}({text})", self.name),
            None => write!(f, "{}(0x{})", self.name, self.payload_hex()),
        }
    }
}

/// Sink for chaincode events.
///
/// Emission is fire-and-forget from the caller's point of view: an `Ok`
/// means the event was accepted, not that anyone received it.
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: ChaincodeEvent) -> EventResult<()>;
}
