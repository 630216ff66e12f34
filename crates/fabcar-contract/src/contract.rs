use fabcar_events::CAR_CREATED;
use fabcar_store::{LedgerStore, StoreError};
use fabcar_types::{codec, seed_cars, Car};
use tracing::{debug, info, info_span, warn};

use crate::config::{ContractConfig, InitMode};
use crate::context::TransactionContext;
use crate::error::{ContractError, ContractResult};

const INIT_LEDGER: &str = "InitLedger";
const CREATE_CAR: &str = "CreateCar";
const QUERY_ALL_CARS: &str = "QueryAllCars";
const QUERY_CAR: &str = "QueryCar";

/// Key reported for failures of a full-namespace range scan.
const FULL_RANGE: &str = "*";

/// Key reported when a seed batch fails without naming a single key.
const SEED_BATCH: &str = "CAR0..CAR5";

/// Invocation boundary of the car contract.
///
/// Each call is a single synchronous unit of work scoped by `ctx`.
/// Implementations hold no state between calls.
pub trait AssetService {
    /// Write the six seed cars.
    fn init_ledger(&self, ctx: &dyn TransactionContext) -> ContractResult<()>;

    /// Write one car, replacing any car with the same ID, then raise
    /// `CarCreated` with the asset ID as payload.
    fn create_car(
        &self,
        ctx: &dyn TransactionContext,
        asset_id: &str,
        make: &str,
        model: &str,
        color: &str,
        owner: &str,
    ) -> ContractResult<()>;

    /// Every car in world state, in ascending key order.
    fn query_all_cars(&self, ctx: &dyn TransactionContext) -> ContractResult<Vec<Car>>;

    /// The car stored under `asset_id`.
    fn query_car(&self, ctx: &dyn TransactionContext, asset_id: &str) -> ContractResult<Car>;
}

/// The fabcar contract.
#[derive(Clone, Debug, Default)]
pub struct AssetContract {
    config: ContractConfig,
}

impl AssetContract {
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Seed with one put per car, stopping at the first failure.
    ///
    /// Cars written before a failure stay in world state.
    pub fn init_ledger_sequential(&self, ctx: &dyn TransactionContext) -> ContractResult<()> {
        let _span = info_span!("init_ledger", tx_id = ctx.tx_id(), mode = "sequential").entered();
        let stub = ctx.stub();
        for car in seed_cars() {
            let bytes = encode(INIT_LEDGER, &car)?;
            stub.put_state(&car.asset_id, &bytes).map_err(|source| {
                warn!(asset_id = %car.asset_id, error = %source, "failed to put car into world state");
                ContractError::Persistence {
                    op: INIT_LEDGER,
                    key: car.asset_id.clone(),
                    source,
                }
            })?;
            debug!(asset_id = %car.asset_id, "seed car written");
        }
        info!(count = fabcar_types::SEED_COUNT, "ledger initialized");
        Ok(())
    }

    /// Seed with a single batch write: all six cars land or none do.
    ///
    /// Atomicity holds only if the store overrides
    /// [`LedgerStore::put_state_batch`].
    pub fn init_ledger_atomic(&self, ctx: &dyn TransactionContext) -> ContractResult<()> {
        let _span = info_span!("init_ledger", tx_id = ctx.tx_id(), mode = "atomic").entered();
        let batch = seed_cars()
            .iter()
            .map(|car| -> ContractResult<(String, Vec<u8>)> {
                Ok((car.asset_id.clone(), encode(INIT_LEDGER, car)?))
            })
            .collect::<ContractResult<Vec<_>>>()?;

        ctx.stub().put_state_batch(&batch).map_err(|source| {
            warn!(error = %source, "failed to put seed batch into world state");
            ContractError::Persistence {
                op: INIT_LEDGER,
                key: failing_key(&source).unwrap_or(SEED_BATCH).to_string(),
                source,
            }
        })?;
        info!(count = batch.len(), "ledger initialized");
        Ok(())
    }
}

impl AssetService for AssetContract {
    fn init_ledger(&self, ctx: &dyn TransactionContext) -> ContractResult<()> {
        match self.config.init_mode {
            InitMode::Sequential => self.init_ledger_sequential(ctx),
            InitMode::Atomic => self.init_ledger_atomic(ctx),
        }
    }

    fn create_car(
        &self,
        ctx: &dyn TransactionContext,
        asset_id: &str,
        make: &str,
        model: &str,
        color: &str,
        owner: &str,
    ) -> ContractResult<()> {
        let _span = info_span!("create_car", tx_id = ctx.tx_id(), asset_id).entered();
        require_asset_id(asset_id)?;

        let car = Car::new(asset_id, make, model, color, owner);
        let bytes = encode(CREATE_CAR, &car)?;

        let stub = ctx.stub();
        stub.put_state(asset_id, &bytes).map_err(|source| {
            warn!(error = %source, "failed to put car into world state");
            ContractError::Persistence {
                op: CREATE_CAR,
                key: asset_id.to_string(),
                source,
            }
        })?;

        stub.set_event(CAR_CREATED, asset_id.as_bytes())
            .map_err(|source| {
                warn!(error = %source, "car stored but event emission failed");
                ContractError::Emit {
                    op: CREATE_CAR,
                    asset_id: asset_id.to_string(),
                    event: CAR_CREATED,
                    source,
                }
            })?;

        info!("car created");
        Ok(())
    }

    fn query_all_cars(&self, ctx: &dyn TransactionContext) -> ContractResult<Vec<Car>> {
        let _span = info_span!("query_all_cars", tx_id = ctx.tx_id()).entered();

        // Dropping the cursor on any early return releases it.
        let mut cursor = ctx
            .stub()
            .get_state_by_range("", "")
            .map_err(scan_error)?;

        let mut cars = Vec::new();
        for entry in cursor.by_ref() {
            let entry = entry.map_err(scan_error)?;
            let car = codec::decode(&entry.value).map_err(|source| {
                warn!(key = %entry.key, error = %source, "failed to decode car");
                ContractError::Decode {
                    op: QUERY_ALL_CARS,
                    key: entry.key.clone(),
                    source,
                }
            })?;
            debug!(car = %car, "found car");
            cars.push(car);
        }
        cursor
            .close()
            .map_err(scan_error)?;

        info!(count = cars.len(), "queried all cars");
        Ok(cars)
    }

    fn query_car(&self, ctx: &dyn TransactionContext, asset_id: &str) -> ContractResult<Car> {
        let _span = info_span!("query_car", tx_id = ctx.tx_id(), asset_id).entered();
        require_asset_id(asset_id)?;

        let bytes = ctx
            .stub()
            .get_state(asset_id)
            .map_err(|source| ContractError::Persistence {
                op: QUERY_CAR,
                key: asset_id.to_string(),
                source,
            })?
            .ok_or_else(|| ContractError::NotFound(asset_id.to_string()))?;

        codec::decode(&bytes).map_err(|source| ContractError::Decode {
            op: QUERY_CAR,
            key: asset_id.to_string(),
            source,
        })
    }
}

fn require_asset_id(asset_id: &str) -> ContractResult<()> {
    if asset_id.is_empty() {
        return Err(ContractError::InvalidArgument(
            "assetID must not be empty".into(),
        ));
    }
    Ok(())
}

fn encode(op: &'static str, car: &Car) -> ContractResult<Vec<u8>> {
    codec::encode(car).map_err(|source| ContractError::Encode {
        op,
        asset_id: car.asset_id.clone(),
        source,
    })
}

fn scan_error(source: StoreError) -> ContractError {
    warn!(error = %source, "failed to iterate cars");
    ContractError::Persistence {
        op: QUERY_ALL_CARS,
        key: FULL_RANGE.to_string(),
        source,
    }
}

fn failing_key(err: &StoreError) -> Option<&str> {
    match err {
        StoreError::WriteRejected { key, .. } => Some(key.as_str()),
        _ => None,
    }
}
