use crate::car::Car;

/// Number of records written by ledger initialization.
pub const SEED_COUNT: usize = 6;

/// The fixed records written by ledger initialization, in key order
/// (`CAR0` through `CAR5`).
pub fn seed_cars() -> [Car; SEED_COUNT] {
    [
        Car::new("CAR0", "Toyota", "Prius", "blue", "Tomoko"),
        Car::new("CAR1", "Ford", "Mustang", "red", "Brad"),
        Car::new("CAR2", "Hyundai", "Tucson", "green", "Jin Soo"),
        Car::new("CAR3", "Volkswagen", "Passat", "yellow", "Max"),
        Car::new("CAR4", "Tesla", "Model S", "black", "Adriana"),
        Car::new("CAR5", "Peugeot", "208", "purple", "Michel"),
    ]
}
