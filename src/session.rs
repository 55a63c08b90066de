//! Turns one session's raw laps and weather into enriched lap records.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::anomaly::flag_anomalies;
use crate::error::SessionError;
use crate::fuel::estimate_fuel;
use crate::model::{LapRecord, RawLap, RawWeatherSample, SessionKind};
use crate::normalize::{TrackId, normalize_compound, normalize_track};
use crate::parser::{optional_seconds, whole_number};
use crate::registry::track_meta_or_default;
use crate::weather::attach_weather;

/// Shortest lap time kept, exclusive.
pub const MIN_LAP_TIME_SECS: f64 = 30.0;
/// Longest lap time kept, exclusive.
pub const MAX_LAP_TIME_SECS: f64 = 300.0;

/// Result of a session that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Enriched(Vec<LapRecord>),
    NoUsableData,
}

impl SessionOutcome {
    pub fn into_laps(self) -> Option<Vec<LapRecord>> {
        match self {
            SessionOutcome::Enriched(laps) => Some(laps),
            SessionOutcome::NoUsableData => None,
        }
    }
}

pub fn is_valid_lap_time(lap_time: Option<f64>) -> bool {
    matches!(lap_time, Some(t) if t > MIN_LAP_TIME_SECS && t < MAX_LAP_TIME_SECS)
}

/// Builds the enriched lap set for one session.
///
/// Weather problems are logged and the session continues without weather.
///
/// # Errors
///
/// Returns an error when a lap cannot be identified (no driver, no lap
/// number, or a repeated driver/lap pair). Nothing of the session is kept.
#[tracing::instrument(
    skip(raw_laps, raw_weather),
    fields(raw_laps = raw_laps.len(), weather_samples = raw_weather.len())
)]
pub fn transform_session(
    season: i32,
    event_name: &str,
    session_kind: SessionKind,
    raw_laps: &[RawLap],
    raw_weather: &[RawWeatherSample],
) -> Result<SessionOutcome, SessionError> {
    let track_id = normalize_track(event_name);

    let mut laps = raw_laps
        .iter()
        .enumerate()
        .map(|(index, raw)| lap_from_raw(index, raw, season, event_name, &track_id, session_kind))
        .collect::<Result<Vec<_>, _>>()?;

    laps.sort_by(|a, b| {
        a.driver
            .cmp(&b.driver)
            .then(a.lap_number.cmp(&b.lap_number))
    });
    reject_duplicates(&laps)?;
    number_stint_laps(&mut laps);

    if let Some(first) = laps.first() {
        let meta = track_meta_or_default(first.track_id.as_str());
        for lap in &mut laps {
            lap.pit_loss_time = meta.pit_loss_time;
            lap.track_length_km = meta.track_length_km;
        }
    }

    for lap in &mut laps {
        lap.fuel_estimate = lap.stint_lap.map(estimate_fuel);
    }

    flag_anomalies(&mut laps);

    if !raw_weather.is_empty() {
        match attach_weather(raw_weather, &mut laps) {
            Ok(fields) => debug!(fields = fields.len(), "Weather attached"),
            Err(e) => warn!(error = %e, "Weather merge failed, continuing without weather"),
        }
    }

    let before = laps.len();
    laps.retain(|lap| is_valid_lap_time(lap.lap_time));
    debug!(discarded = before - laps.len(), "Dropped laps outside the valid range");

    if laps.is_empty() {
        warn!(event = event_name, season, "No usable laps");
        return Ok(SessionOutcome::NoUsableData);
    }

    info!(event = event_name, season, laps = laps.len(), "Session transformed");
    Ok(SessionOutcome::Enriched(laps))
}

fn lap_from_raw(
    index: usize,
    raw: &RawLap,
    season: i32,
    event_name: &str,
    track_id: &TrackId,
    session_kind: SessionKind,
) -> Result<LapRecord, SessionError> {
    let driver = raw
        .driver
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(SessionError::MissingDriver { index })?;
    let lap_number =
        whole_number(raw.lap_number).ok_or(SessionError::MissingLapNumber { index })?;

    Ok(LapRecord {
        season,
        event_name: event_name.to_string(),
        track_id: track_id.clone(),
        session_kind,
        driver: driver.to_string(),
        lap_number,
        lap_time: optional_seconds(raw.lap_time.as_ref()),
        sector1_time: optional_seconds(raw.sector1_time.as_ref()),
        sector2_time: optional_seconds(raw.sector2_time.as_ref()),
        sector3_time: optional_seconds(raw.sector3_time.as_ref()),
        compound_raw: raw.compound.clone(),
        stint: whole_number(raw.stint),
        session_time: optional_seconds(raw.time.as_ref()),
        compound: normalize_compound(raw.compound.as_deref()),
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
    })
}

fn reject_duplicates(laps: &[LapRecord]) -> Result<(), SessionError> {
    let mut seen = HashSet::with_capacity(laps.len());
    for lap in laps {
        if !seen.insert((lap.driver.as_str(), lap.lap_number)) {
            return Err(SessionError::DuplicateLap {
                driver: lap.driver.clone(),
                lap_number: lap.lap_number,
            });
        }
    }
    Ok(())
}

/// Numbers laps 1, 2, ... within each (driver, stint). Expects laps sorted by
/// driver then lap number. Laps without a stint index stay unnumbered.
fn number_stint_laps(laps: &mut [LapRecord]) {
    let mut counters: HashMap<(String, u32), u32> = HashMap::new();
    for lap in laps.iter_mut() {
        let Some(stint) = lap.stint else {
            lap.stint_lap = None;
            continue;
        };
        let counter = counters.entry((lap.driver.clone(), stint)).or_insert(0);
        *counter += 1;
        lap.stint_lap = Some(*counter);
    }
}
