//! Safety-car and outlier flags per driver.
//!
//! Crude heuristic: a lap well above its local rolling median is treated as
//! neutralised running, and a lap at more than double the driver's session
//! median is an outlier.

use std::collections::BTreeMap;

use crate::analyzers::utility::median;
use crate::model::LapRecord;

/// Rolling window length, centered on the lap being judged.
pub const WINDOW: usize = 5;
/// Minimum laps a driver needs before any flag is computed.
pub const MIN_LAPS: usize = WINDOW;
pub const SAFETY_CAR_FACTOR: f64 = 1.20;
pub const OUTLIER_FACTOR: f64 = 2.0;

/// Sets `is_safety_car` and `is_outlier` on every lap, driver by driver.
///
/// Laps of drivers with fewer than [`MIN_LAPS`] laps keep both flags false.
pub fn flag_anomalies(laps: &mut [LapRecord]) {
    let mut by_driver: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, lap) in laps.iter_mut().enumerate() {
        lap.is_safety_car = false;
        lap.is_outlier = false;
        by_driver.entry(lap.driver.clone()).or_default().push(idx);
    }

    for indices in by_driver.values_mut() {
        if indices.len() < MIN_LAPS {
            continue;
        }
        indices.sort_by_key(|&idx| laps[idx].lap_number);

        let times: Vec<Option<f64>> = indices.iter().map(|&idx| laps[idx].lap_time).collect();
        let rolling = rolling_median(&times, WINDOW);
        let present: Vec<f64> = times.iter().flatten().copied().collect();
        let session_median = median(&present);

        for (pos, &idx) in indices.iter().enumerate() {
            let Some(lap_time) = times[pos] else {
                continue;
            };
            if let Some(local) = rolling[pos] {
                laps[idx].is_safety_car = lap_time > local * SAFETY_CAR_FACTOR;
            }
            if let Some(overall) = session_median {
                laps[idx].is_outlier = lap_time > overall * OUTLIER_FACTOR;
            }
        }
    }
}

/// Centered rolling median over a fixed odd-sized window.
///
/// Positions whose window runs off either end, or covers an absent value,
/// have no median.
pub fn rolling_median(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let half = window / 2;
    for (start, slice) in values.windows(window).enumerate() {
        let complete: Option<Vec<f64>> = slice.iter().copied().collect();
        out[start + half] = complete.and_then(|w| median(&w));
    }
    out
}
