//! Car asset contract for the fabcar ledger.
//!
//! The contract is stateless: every operation receives a
//! [`TransactionContext`] that scopes its access to world state, and keeps
//! nothing between calls. It provides:
//! - `InitLedger` -- seed the six fixed cars
//! - `CreateCar` -- write one car and raise a `CarCreated` event
//! - `QueryAllCars` -- decode every car in key order
//! - `QueryCar` -- decode a single car by ID

pub mod config;
pub mod context;
pub mod contract;
pub mod error;

pub use config::{ContractConfig, InitMode};
pub use context::{StoreContext, TransactionContext};
pub use contract::{AssetContract, AssetService};
pub use error::{ContractError, ContractResult};

pub use fabcar_types::Car;
