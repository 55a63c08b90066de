//! Typed failures of the transformation core.
//!
//! Provider and storage code stays on `anyhow`; these enums cover the cases
//! callers branch on.

use thiserror::Error;

/// A provider payload that could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid {what} payload: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The weather join could not run; the session continues without weather.
#[derive(Debug, Error, PartialEq)]
pub enum WeatherError {
    #[error("weather sample {index} has no timestamp")]
    MissingTimestamp { index: usize },
    #[error("weather sample {index} has an unreadable timestamp {raw:?}")]
    MalformedTimestamp { index: usize, raw: String },
}

/// The whole session is abandoned.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("lap {index} has no driver")]
    MissingDriver { index: usize },
    #[error("lap {index} has no usable lap number")]
    MissingLapNumber { index: usize },
    #[error("duplicate lap {lap_number} for driver {driver}")]
    DuplicateLap { driver: String, lap_number: u32 },
}
