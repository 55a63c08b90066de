//! Nearest-past-sample join of session weather onto laps.

use crate::error::WeatherError;
use crate::model::{LapRecord, RawWeatherSample, WeatherSample};
use crate::parser::duration_seconds;

/// A weather reading that can be carried onto a lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherField {
    AirTemp,
    TrackTemp,
    Humidity,
    WindSpeed,
    Rainfall,
}

/// The fields transferred during session transformation.
pub const WEATHER_FIELDS: [WeatherField; 5] = [
    WeatherField::AirTemp,
    WeatherField::TrackTemp,
    WeatherField::Humidity,
    WeatherField::WindSpeed,
    WeatherField::Rainfall,
];

impl WeatherField {
    fn present_in(self, sample: &WeatherSample) -> bool {
        match self {
            WeatherField::AirTemp => sample.air_temp.is_some(),
            WeatherField::TrackTemp => sample.track_temp.is_some(),
            WeatherField::Humidity => sample.humidity.is_some(),
            WeatherField::WindSpeed => sample.wind_speed.is_some(),
            WeatherField::Rainfall => sample.rainfall.is_some(),
        }
    }

    fn copy(self, sample: &WeatherSample, lap: &mut LapRecord) {
        match self {
            WeatherField::AirTemp => lap.air_temp = sample.air_temp,
            WeatherField::TrackTemp => lap.track_temp = sample.track_temp,
            WeatherField::Humidity => lap.humidity = sample.humidity,
            WeatherField::WindSpeed => lap.wind_speed = sample.wind_speed,
            WeatherField::Rainfall => lap.rainfall = sample.rainfall,
        }
    }
}

/// Converts raw readings into samples sorted by session time.
///
/// # Errors
///
/// Fails on the first sample whose timestamp is missing or unreadable.
pub fn weather_samples(raw: &[RawWeatherSample]) -> Result<Vec<WeatherSample>, WeatherError> {
    let mut samples = raw
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let time = match &sample.time {
                None => return Err(WeatherError::MissingTimestamp { index }),
                Some(raw_time) => {
                    duration_seconds(raw_time).ok_or_else(|| WeatherError::MalformedTimestamp {
                        index,
                        raw: format!("{raw_time:?}"),
                    })?
                }
            };
            Ok(WeatherSample {
                time,
                air_temp: sample.air_temp,
                track_temp: sample.track_temp,
                humidity: sample.humidity,
                wind_speed: sample.wind_speed,
                rainfall: sample.rainfall.map(|flag| flag.as_bool()),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    samples.sort_by(|a, b| a.time.total_cmp(&b.time));
    Ok(samples)
}

/// Index of the sample in effect at `elapsed`.
///
/// That is the latest sample at or before `elapsed`, or the first sample when
/// the lap precedes every reading or has no elapsed time.
fn sample_at(samples: &[WeatherSample], elapsed: Option<f64>) -> usize {
    let Some(t) = elapsed else {
        return 0;
    };
    samples.partition_point(|s| s.time <= t).saturating_sub(1)
}

/// Attaches `fields` from time-sorted `samples` onto every lap.
///
/// Fields that no sample carries are left untouched. Returns the fields that
/// were attached.
pub fn align_weather(
    samples: &[WeatherSample],
    laps: &mut [LapRecord],
    fields: &[WeatherField],
) -> Vec<WeatherField> {
    if samples.is_empty() {
        return Vec::new();
    }

    let available: Vec<WeatherField> = fields
        .iter()
        .copied()
        .filter(|field| samples.iter().any(|s| field.present_in(s)))
        .collect();

    for lap in laps.iter_mut() {
        let sample = &samples[sample_at(samples, lap.session_time)];
        for field in &available {
            field.copy(sample, lap);
        }
    }

    available
}

/// Parses `raw` and joins every standard weather field onto `laps`.
pub fn attach_weather(
    raw: &[RawWeatherSample],
    laps: &mut [LapRecord],
) -> Result<Vec<WeatherField>, WeatherError> {
    let samples = weather_samples(raw)?;
    Ok(align_weather(&samples, laps, &WEATHER_FIELDS))
}
