//! Foundation types for the fabcar asset ledger.
//!
//! This crate owns the only entity the ledger manages, the [`Car`] asset
//! record, together with the codec that turns it into the bytes persisted in
//! world state. Every other fabcar crate depends on `fabcar-types`.
//!
//! # Key Types
//!
//! - [`Car`] -- asset record keyed by its `assetID`
//! - [`encode`] / [`decode`] -- field-named JSON codec for world-state values
//! - [`seed_cars`] -- the six fixed records written by ledger initialization
//!
//! # Encoded Shape
//!
//! A stored car is a JSON object with exactly the keys `assetID`, `make`,
//! `model`, `color` and `owner`, all strings, written in that order. This
//! shape is shared with external readers of the world state and must stay
//! stable.

pub mod car;
pub mod codec;
pub mod error;
pub mod seed;

pub use car::Car;
pub use codec::{decode, encode};
pub use error::{CodecError, CodecResult};
pub use seed::{seed_cars, SEED_COUNT};
