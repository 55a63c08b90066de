//! Trait and path layout for raw race-data providers.

use anyhow::Result;

use crate::model::{RawSession, ScheduledEvent, SessionKind};
use crate::normalize::normalize_track;

/// Abstraction over a source of raw lap and weather data.
///
/// Implementations are thin I/O wrappers; they do not retry.
#[async_trait::async_trait]
pub trait RaceDataProvider: Send + Sync {
    /// Returns every event of `year` in calendar order.
    async fn schedule(&self, year: i32) -> Result<Vec<ScheduledEvent>>;

    /// Returns the raw laps and weather of one session.
    async fn session(&self, year: i32, event_name: &str, kind: SessionKind) -> Result<RawSession>;
}

/// Relative location of a season schedule.
pub fn schedule_path(year: i32) -> String {
    format!("{year}/schedule.json")
}

/// Relative location of a session payload, keyed by canonical track id.
pub fn session_path(year: i32, event_name: &str, kind: SessionKind) -> String {
    format!("{year}/{}/{}.json", normalize_track(event_name), kind.code())
}
