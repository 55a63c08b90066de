//! Builders shared by unit tests.

use crate::model::{LapRecord, RawDuration, RawLap, SessionKind};
use crate::normalize::{Compound, normalize_track};

/// An enriched lap with neutral defaults.
pub fn lap(driver: &str, lap_number: u32, lap_time: Option<f64>) -> LapRecord {
    LapRecord {
        season: 2023,
        event_name: "Bahrain Grand Prix".to_string(),
        track_id: normalize_track("Bahrain Grand Prix"),
        session_kind: SessionKind::Race,
        driver: driver.to_string(),
        lap_number,
        lap_time,
        sector1_time: None,
        sector2_time: None,
        sector3_time: None,
        compound_raw: None,
        stint: Some(1),
        session_time: None,
        compound: Compound::Unknown,
        stint_lap: None,
        fuel_estimate: None,
        pit_loss_time: 0.0,
        track_length_km: 0.0,
        is_safety_car: false,
        is_outlier: false,
        air_temp: None,
        track_temp: None,
        humidity: None,
        wind_speed: None,
        rainfall: None,
    }
}

/// A raw lap with lap time, stint and elapsed time in seconds.
pub fn raw_lap(driver: &str, lap_number: u32, lap_time: f64, stint: u32, elapsed: f64) -> RawLap {
    RawLap {
        driver: Some(driver.to_string()),
        lap_number: Some(f64::from(lap_number)),
        lap_time: Some(RawDuration::Seconds(lap_time)),
        sector1_time: Some(RawDuration::Seconds(lap_time / 3.0)),
        sector2_time: Some(RawDuration::Seconds(lap_time / 3.0)),
        sector3_time: Some(RawDuration::Seconds(lap_time / 3.0)),
        compound: Some("MEDIUM".to_string()),
        stint: Some(f64::from(stint)),
        time: Some(RawDuration::Seconds(elapsed)),
    }
}
