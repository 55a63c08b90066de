//! Raw provider records and the enriched lap dataset.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::normalize::{Compound, TrackId};

/// Which session of a race weekend a lap belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Practice1,
    Practice2,
    Practice3,
    Qualifying,
    Sprint,
    Race,
}

impl SessionKind {
    /// Short code used in provider paths.
    pub fn code(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "FP1",
            SessionKind::Practice2 => "FP2",
            SessionKind::Practice3 => "FP3",
            SessionKind::Qualifying => "Q",
            SessionKind::Sprint => "S",
            SessionKind::Race => "R",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionKind::Practice1 => "Practice 1",
            SessionKind::Practice2 => "Practice 2",
            SessionKind::Practice3 => "Practice 3",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Sprint => "Sprint",
            SessionKind::Race => "Race",
        };
        f.write_str(label)
    }
}

/// Weekend format as reported by the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFormat {
    Conventional,
    Sprint,
    SprintShootout,
    SprintQualifying,
    Testing,
    #[serde(other)]
    Other,
}

/// One entry of a season schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent {
    #[serde(alias = "EventName")]
    pub name: String,
    #[serde(alias = "EventFormat")]
    pub format: EventFormat,
}

impl ScheduledEvent {
    pub fn is_conventional(&self) -> bool {
        self.format == EventFormat::Conventional
    }
}

/// A duration as providers send it: plain seconds or a formatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Seconds(f64),
    Text(String),
}

/// Rainfall arrives as a boolean or as a numeric indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFlag {
    Bool(bool),
    Number(f64),
}

impl RawFlag {
    pub fn as_bool(&self) -> bool {
        match *self {
            RawFlag::Bool(b) => b,
            RawFlag::Number(n) => n != 0.0,
        }
    }
}

/// Reads an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Reads the weather list entry by entry. An entry that is not an object
/// becomes an empty sample, which the weather join rejects for its missing
/// timestamp. Anything but an array reads as no weather.
fn lenient_samples<'de, D>(deserializer: D) -> Result<Vec<RawWeatherSample>, D::Error>
where
    D: Deserializer<'de>,
{
    let serde_json::Value::Array(entries) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect())
}

/// A lap exactly as the provider sent it.
///
/// Fields holding a value of the wrong type decode as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLap {
    #[serde(default, alias = "Driver", deserialize_with = "lenient")]
    pub driver: Option<String>,
    #[serde(default, alias = "LapNumber", deserialize_with = "lenient")]
    pub lap_number: Option<f64>,
    #[serde(default, alias = "LapTime", deserialize_with = "lenient")]
    pub lap_time: Option<RawDuration>,
    #[serde(default, alias = "Sector1Time", deserialize_with = "lenient")]
    pub sector1_time: Option<RawDuration>,
    #[serde(default, alias = "Sector2Time", deserialize_with = "lenient")]
    pub sector2_time: Option<RawDuration>,
    #[serde(default, alias = "Sector3Time", deserialize_with = "lenient")]
    pub sector3_time: Option<RawDuration>,
    #[serde(default, alias = "Compound", deserialize_with = "lenient")]
    pub compound: Option<String>,
    #[serde(default, alias = "Stint", deserialize_with = "lenient")]
    pub stint: Option<f64>,
    /// Elapsed session time when the lap was set.
    #[serde(default, alias = "Time", deserialize_with = "lenient")]
    pub time: Option<RawDuration>,
}

/// A weather reading exactly as the provider sent it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWeatherSample {
    #[serde(default, alias = "Time", deserialize_with = "lenient")]
    pub time: Option<RawDuration>,
    #[serde(default, alias = "AirTemp", deserialize_with = "lenient")]
    pub air_temp: Option<f64>,
    #[serde(default, alias = "TrackTemp", deserialize_with = "lenient")]
    pub track_temp: Option<f64>,
    #[serde(default, alias = "Humidity", deserialize_with = "lenient")]
    pub humidity: Option<f64>,
    #[serde(default, alias = "WindSpeed", deserialize_with = "lenient")]
    pub wind_speed: Option<f64>,
    #[serde(default, alias = "Rainfall", deserialize_with = "lenient")]
    pub rainfall: Option<RawFlag>,
}

/// Everything a provider returns for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSession {
    #[serde(default)]
    pub laps: Vec<RawLap>,
    #[serde(default, deserialize_with = "lenient_samples")]
    pub weather: Vec<RawWeatherSample>,
}

/// A weather reading with its session timestamp in seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSample {
    pub time: f64,
    pub air_temp: Option<f64>,
    pub track_temp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub rainfall: Option<bool>,
}

/// One driver's completed lap, enriched for analysis.
///
/// Flat so it maps one-to-one onto a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub season: i32,
    pub event_name: String,
    pub track_id: TrackId,
    pub session_kind: SessionKind,
    pub driver: String,
    pub lap_number: u32,

    pub lap_time: Option<f64>,
    pub sector1_time: Option<f64>,
    pub sector2_time: Option<f64>,
    pub sector3_time: Option<f64>,
    pub compound_raw: Option<String>,
    pub stint: Option<u32>,
    pub session_time: Option<f64>,

    pub compound: Compound,
    pub stint_lap: Option<u32>,
    pub fuel_estimate: Option<f64>,
    pub pit_loss_time: f64,
    pub track_length_km: f64,
    pub is_safety_car: bool,
    pub is_outlier: bool,

    pub air_temp: Option<f64>,
    pub track_temp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub rainfall: Option<bool>,
}

/// Why a session contributed nothing to a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ProviderFailure,
    InvalidSession,
    NoUsableData,
}

/// A session left out of a season dataset.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSession {
    pub season: i32,
    pub event_name: String,
    pub reason: SkipReason,
}

/// All enriched laps of the requested seasons, in event order.
#[derive(Debug, Clone, Default)]
pub struct SeasonDataset {
    pub laps: Vec<LapRecord>,
    pub skipped: Vec<SkippedSession>,
}

impl SeasonDataset {
    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }
}
