//! Decoding of provider payloads and duration values.

use crate::error::DecodeError;
use crate::model::{RawDuration, RawSession, ScheduledEvent};

/// Decodes a JSON session payload (`{"laps": [...], "weather": [...]}`).
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON object of that shape. Field
/// values of the wrong type do not fail the decode; they read as absent.
pub fn parse_session(bytes: &[u8]) -> Result<RawSession, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| DecodeError::Json {
        what: "session",
        source,
    })
}

/// Decodes a JSON schedule payload (an array of events).
pub fn parse_schedule(bytes: &[u8]) -> Result<Vec<ScheduledEvent>, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| DecodeError::Json {
        what: "schedule",
        source,
    })
}

/// Converts a provider duration to seconds.
///
/// Accepts plain seconds and the string forms `SS.fff`, `M:SS.fff`,
/// `H:MM:SS.fff` and `D days HH:MM:SS.ffffff`. Anything else, including
/// non-finite numbers, yields `None`.
pub fn duration_seconds(raw: &RawDuration) -> Option<f64> {
    match raw {
        RawDuration::Seconds(secs) => secs.is_finite().then_some(*secs),
        RawDuration::Text(text) => parse_duration_text(text),
    }
}

pub fn optional_seconds(raw: Option<&RawDuration>) -> Option<f64> {
    raw.and_then(duration_seconds)
}

fn parse_duration_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (days, clock) = match text.split_once("day") {
        Some((days, rest)) => {
            let days: f64 = days.trim().parse().ok()?;
            let rest = rest.trim_start_matches('s').trim();
            (days, rest)
        }
        None => (0.0, text),
    };

    let (negative, clock) = match clock.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, clock),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut seconds = 0.0;
    for part in &parts {
        let value: f64 = part.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        seconds = seconds * 60.0 + value;
    }

    let seconds = if negative { -seconds } else { seconds };
    Some(days * 86_400.0 + seconds)
}

/// Converts a float-encoded integer field (e.g. `3.0`) to `u32`.
pub fn whole_number(value: Option<f64>) -> Option<u32> {
    let value = value?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}
