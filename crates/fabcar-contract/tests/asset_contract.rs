use std::sync::Arc;

use fabcar_contract::{
    AssetContract, AssetService, Car, ContractConfig, ContractError, InitMode, StoreContext,
};
use fabcar_events::{EventBus, EventFilter, CAR_CREATED};
use fabcar_store::{InMemoryLedgerStore, LedgerStore, StoreError};
use fabcar_types::seed_cars;

fn store_with_bus() -> (Arc<EventBus>, InMemoryLedgerStore) {
    let bus = Arc::new(EventBus::new());
    let store = InMemoryLedgerStore::with_event_bus(bus.clone());
    (bus, store)
}

fn ids(cars: &[Car]) -> Vec<&str> {
    cars.iter().map(|c| c.asset_id.as_str()).collect()
}

// ---------------------------------------------------------------------------
// InitLedger
// ---------------------------------------------------------------------------

#[test]
fn init_ledger_seeds_six_cars_in_order() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    contract.init_ledger(&StoreContext::new(&store)).unwrap();

    let cars = contract.query_all_cars(&StoreContext::new(&store)).unwrap();
    assert_eq!(ids(&cars), ["CAR0", "CAR1", "CAR2", "CAR3", "CAR4", "CAR5"]);
    assert_eq!(cars, seed_cars().to_vec());
}

#[test]
fn init_ledger_twice_is_idempotent() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    contract.init_ledger(&StoreContext::new(&store)).unwrap();
    let first = store.snapshot().unwrap();

    contract.init_ledger(&StoreContext::new(&store)).unwrap();
    assert_eq!(store.snapshot().unwrap(), first);
    assert_eq!(store.len(), 6);
}

#[test]
fn init_ledger_emits_no_events() {
    let (bus, store) = store_with_bus();
    AssetContract::default()
        .init_ledger(&StoreContext::new(&store))
        .unwrap();
    assert!(bus.emitted().is_empty());
}

#[test]
fn sequential_init_keeps_partial_writes() {
    let store = InMemoryLedgerStore::new();
    store.fail_put_on("CAR3");
    let err = AssetContract::default()
        .init_ledger(&StoreContext::new(&store))
        .unwrap_err();

    match err {
        ContractError::Persistence { op, ref key, .. } => {
            assert_eq!(op, "InitLedger");
            assert_eq!(key, "CAR3");
        }
        other => panic!("unexpected error: {other}"),
    }
    let written: Vec<String> = store.snapshot().unwrap().into_keys().collect();
    assert_eq!(written, ["CAR0", "CAR1", "CAR2"]);
}

#[test]
fn atomic_init_writes_nothing_on_failure() {
    let store = InMemoryLedgerStore::new();
    store.fail_put_on("CAR4");
    let contract = AssetContract::new(ContractConfig {
        init_mode: InitMode::Atomic,
        ..Default::default()
    });

    let err = contract.init_ledger(&StoreContext::new(&store)).unwrap_err();
    assert_eq!(err.key(), Some("CAR4"));
    assert!(store.is_empty());

    store.clear_faults();
    contract.init_ledger(&StoreContext::new(&store)).unwrap();
    assert_eq!(store.len(), 6);
}

// ---------------------------------------------------------------------------
// CreateCar
// ---------------------------------------------------------------------------

#[test]
fn create_car_is_visible_to_query_all() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    contract
        .create_car(&StoreContext::new(&store), "CARX", "Toyota", "Prius", "blue", "Tomoko")
        .unwrap();

    let cars = contract.query_all_cars(&StoreContext::new(&store)).unwrap();
    assert_eq!(cars, vec![Car::new("CARX", "Toyota", "Prius", "blue", "Tomoko")]);
}

#[test]
fn create_car_overwrites_existing_id() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    let ctx = StoreContext::new(&store);
    contract
        .create_car(&ctx, "CARX", "Toyota", "Prius", "blue", "Tomoko")
        .unwrap();
    contract
        .create_car(&ctx, "CARX", "Honda", "Civic", "white", "Ana")
        .unwrap();

    let cars = contract.query_all_cars(&ctx).unwrap();
    assert_eq!(cars, vec![Car::new("CARX", "Honda", "Civic", "white", "Ana")]);
}

#[test]
fn create_car_overwrites_seed_record() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    let ctx = StoreContext::new(&store);
    contract.init_ledger(&ctx).unwrap();
    contract
        .create_car(&ctx, "CAR1", "Ford", "Mustang", "red", "Dave")
        .unwrap();

    let cars = contract.query_all_cars(&ctx).unwrap();
    assert_eq!(cars.len(), 6);
    assert_eq!(cars[1].owner, "Dave");
}

#[test]
fn create_car_emits_car_created_with_raw_id() {
    let (bus, store) = store_with_bus();
    let mut stream = bus.subscribe(EventFilter::named(CAR_CREATED));

    AssetContract::default()
        .create_car(&StoreContext::new(&store), "CAR7", "Tesla", "Model 3", "red", "Li")
        .unwrap();

    let event = stream.try_recv().unwrap();
    assert_eq!(event.name, "CarCreated");
    assert_eq!(event.payload, b"CAR7");
    assert_eq!(bus.emitted().len(), 1);
}

#[test]
fn emit_failure_is_distinct_and_keeps_the_write() {
    let (bus, store) = store_with_bus();
    bus.close();
    let contract = AssetContract::default();
    let ctx = StoreContext::new(&store);

    let err = contract
        .create_car(&ctx, "CAR7", "Tesla", "Model 3", "red", "Li")
        .unwrap_err();
    assert!(matches!(err, ContractError::Emit { .. }));
    assert!(err.is_persisted());

    let car = contract.query_car(&ctx, "CAR7").unwrap();
    assert_eq!(car.owner, "Li");
}

#[test]
fn put_failure_skips_the_event() {
    let (bus, store) = store_with_bus();
    store.fail_put_on("CAR7");

    let err = AssetContract::default()
        .create_car(&StoreContext::new(&store), "CAR7", "Tesla", "Model 3", "red", "Li")
        .unwrap_err();
    assert!(matches!(
        err,
        ContractError::Persistence { source: StoreError::WriteRejected { .. }, .. }
    ));
    assert!(!err.is_persisted());
    assert!(bus.emitted().is_empty());
    assert!(store.is_empty());
}

#[test]
fn empty_asset_id_is_invalid() {
    let (bus, store) = store_with_bus();
    let err = AssetContract::default()
        .create_car(&StoreContext::new(&store), "", "a", "b", "c", "d")
        .unwrap_err();
    assert!(matches!(err, ContractError::InvalidArgument(_)));
    assert!(bus.emitted().is_empty());
}

// ---------------------------------------------------------------------------
// QueryAllCars
// ---------------------------------------------------------------------------

#[test]
fn query_all_on_empty_store_is_empty() {
    let store = InMemoryLedgerStore::new();
    let cars = AssetContract::default()
        .query_all_cars(&StoreContext::new(&store))
        .unwrap();
    assert!(cars.is_empty());
    assert_eq!(store.open_cursors(), 0);
}

#[test]
fn query_all_orders_lexicographically() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    let ctx = StoreContext::new(&store);
    for id in ["CAR10", "CAR2", "CAR1"] {
        contract.create_car(&ctx, id, "m", "m", "c", "o").unwrap();
    }
    let cars = contract.query_all_cars(&ctx).unwrap();
    assert_eq!(ids(&cars), ["CAR1", "CAR10", "CAR2"]);
}

#[test]
fn undecodable_record_fails_the_whole_query() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    let ctx = StoreContext::new(&store);
    contract.init_ledger(&ctx).unwrap();
    store.put_state("CAR2", b"{\"assetID\":\"CAR2\"}").unwrap();

    let err = contract.query_all_cars(&ctx).unwrap_err();
    match err {
        ContractError::Decode { op, ref key, .. } => {
            assert_eq!(op, "QueryAllCars");
            assert_eq!(key, "CAR2");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.open_cursors(), 0);
}

#[test]
fn scan_open_failure_is_persistence_error() {
    let store = InMemoryLedgerStore::new();
    store.fail_range_scans();
    let err = AssetContract::default()
        .query_all_cars(&StoreContext::new(&store))
        .unwrap_err();
    assert!(matches!(
        err,
        ContractError::Persistence { source: StoreError::ScanRejected(_), .. }
    ));
    assert_eq!(store.cursors_opened(), 0);
}

#[test]
fn repeated_mid_scan_failures_do_not_leak_cursors() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    contract.init_ledger(&StoreContext::new(&store)).unwrap();
    store.fail_cursor_after(3);

    for _ in 0..5 {
        let err = contract
            .query_all_cars(&StoreContext::new(&store))
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::Persistence { source: StoreError::Cursor { position: 3, .. }, .. }
        ));
    }
    assert_eq!(store.cursors_opened(), 5);
    assert_eq!(store.open_cursors(), 0);
}

#[test]
fn cursor_release_failure_after_full_scan_is_persistence_error() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    contract.init_ledger(&StoreContext::new(&store)).unwrap();
    store.fail_cursor_close();

    let err = contract
        .query_all_cars(&StoreContext::new(&store))
        .unwrap_err();
    match err {
        ContractError::Persistence { op, ref key, ref source } => {
            assert_eq!(op, "QueryAllCars");
            assert_eq!(key, "*");
            assert!(matches!(source, StoreError::Cursor { position: 6, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.open_cursors(), 0);
}

#[test]
fn event_log_stays_bounded_for_long_lived_store() {
    let bus = Arc::new(EventBus::with_capacity(16));
    let store = InMemoryLedgerStore::with_event_bus(bus.clone());
    let contract = AssetContract::default();
    for _ in 0..1_000 {
        contract
            .create_car(&StoreContext::new(&store), "CARX", "Toyota", "Prius", "blue", "Tomoko")
            .unwrap();
    }
    assert_eq!(store.len(), 1);
    assert_eq!(bus.emitted().len(), 16);
}

#[test]
fn successful_queries_release_their_cursor() {
    let store = InMemoryLedgerStore::new();
    let contract = AssetContract::default();
    contract.init_ledger(&StoreContext::new(&store)).unwrap();
    for _ in 0..3 {
        contract.query_all_cars(&StoreContext::new(&store)).unwrap();
    }
    assert_eq!(store.cursors_opened(), 3);
    assert_eq!(store.open_cursors(), 0);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_invocations_share_only_the_store() {
    use std::thread;

    let store = Arc::new(InMemoryLedgerStore::new());
    let contract = Arc::new(AssetContract::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            let contract = Arc::clone(&contract);
            thread::spawn(move || {
                let ctx = StoreContext::new(store.as_ref());
                contract
                    .create_car(&ctx, &format!("CAR{i:02}"), "m", "m", "c", "o")
                    .unwrap();
                contract.query_all_cars(&ctx).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().expect("thread should not panic");
    }

    let cars = contract
        .query_all_cars(&StoreContext::new(store.as_ref()))
        .unwrap();
    assert_eq!(cars.len(), 8);
    assert_eq!(store.open_cursors(), 0);
}
