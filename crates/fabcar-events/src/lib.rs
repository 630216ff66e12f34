//! Event emission for the fabcar ledger.
//!
//! Chaincode events are best-effort notifications raised alongside a state
//! change and consumed by off-chain listeners. They are never persisted in
//! world state: a failed emission is reported to the caller but cannot undo
//! the write it accompanies.

pub mod bus;
pub mod error;
pub mod event;

pub use bus::{EventBus, EventFilter, EventStream};
pub use error::{EventError, EventResult};
pub use event::{ChaincodeEvent, EventEmitter, CAR_CREATED};
