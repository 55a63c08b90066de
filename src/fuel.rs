/// Fuel load at the start of a stint, kg.
pub const START_FUEL_KG: f64 = 100.0;
/// Linear burn per lap, kg.
pub const BURN_PER_LAP_KG: f64 = 2.0;
/// Minimum reserve the estimate never drops below, kg.
pub const RESERVE_FUEL_KG: f64 = 10.0;

/// Crude linear fuel model with the default start load and burn rate.
pub fn estimate_fuel(stint_lap: u32) -> f64 {
    estimate_fuel_with(stint_lap, START_FUEL_KG, BURN_PER_LAP_KG)
}

/// Linear fuel model floored at [`RESERVE_FUEL_KG`].
pub fn estimate_fuel_with(stint_lap: u32, start_fuel: f64, burn_per_lap: f64) -> f64 {
    (start_fuel - f64::from(stint_lap) * burn_per_lap).max(RESERVE_FUEL_KG)
}
