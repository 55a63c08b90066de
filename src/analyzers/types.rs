//! Data types produced by the summary pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::normalize::{Compound, TrackId};

/// Per-race totals, one row per (season, track, event).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceSummary {
    pub season: i32,
    pub track_id: TrackId,
    pub event_name: String,
    pub total_laps: usize,
    pub avg_lap: Option<f64>,
    pub fastest_lap: Option<f64>,
    pub sc_laps: usize,
}

/// Race summaries as written to `race_summary.json`.
#[derive(Debug, Serialize)]
pub struct RaceSummaryIndex {
    pub generated_at: DateTime<Utc>,
    pub races: Vec<RaceSummary>,
}

/// Lap time spread over non-outlier laps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LapTimeStats {
    pub fastest: f64,
    pub average: f64,
    pub slowest: f64,
    pub stddev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundCount {
    pub compound: Compound,
    pub laps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonBreakdown {
    pub season: i32,
    pub laps: usize,
    pub races: usize,
}

/// Data quality overview of an enriched lap set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetReport {
    pub total_laps: usize,
    pub races: usize,
    pub drivers: usize,
    pub tracks: usize,

    pub missing_lap_times: usize,
    pub outlier_laps: usize,
    pub safety_car_laps: usize,
    pub outlier_pct: f64,
    pub safety_car_pct: f64,

    pub lap_times: Option<LapTimeStats>,
    pub compounds: Vec<CompoundCount>,
    pub seasons: Vec<SeasonBreakdown>,
}
