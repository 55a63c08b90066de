//! Runs the session transformer over whole seasons.

use tracing::{error, info, warn};

use crate::model::{SeasonDataset, SessionKind, SkipReason, SkippedSession};
use crate::services::RaceDataProvider;
use crate::session::{SessionOutcome, transform_session};

/// Transforms the race of every conventional event in `years`.
///
/// Provider and session failures are logged and skipped. Returns `None`
/// when no session produced any laps.
#[tracing::instrument(skip(provider))]
pub async fn build_season<P>(provider: &P, years: &[i32]) -> Option<SeasonDataset>
where
    P: RaceDataProvider + ?Sized,
{
    let mut dataset = SeasonDataset::default();

    for &year in years {
        info!(season = year, "Season");
        let schedule = match provider.schedule(year).await {
            Ok(schedule) => schedule,
            Err(e) => {
                error!(season = year, error = %e, "Schedule retrieval failed, skipping season");
                continue;
            }
        };

        let races: Vec<_> = schedule.iter().filter(|ev| ev.is_conventional()).collect();
        info!(season = year, events = races.len(), "Conventional events");

        for event in races {
            let skip = |reason| SkippedSession {
                season: year,
                event_name: event.name.clone(),
                reason,
            };

            let raw = match provider.session(year, &event.name, SessionKind::Race).await {
                Ok(raw) => raw,
                Err(e) => {
                    error!(season = year, event = %event.name, error = %e, "Session retrieval failed");
                    dataset.skipped.push(skip(SkipReason::ProviderFailure));
                    continue;
                }
            };

            match transform_session(year, &event.name, SessionKind::Race, &raw.laps, &raw.weather) {
                Ok(SessionOutcome::Enriched(laps)) => dataset.laps.extend(laps),
                Ok(SessionOutcome::NoUsableData) => {
                    warn!(season = year, event = %event.name, "No usable data, skipping event");
                    dataset.skipped.push(skip(SkipReason::NoUsableData));
                }
                Err(e) => {
                    error!(season = year, event = %event.name, error = %e, "Session abandoned");
                    dataset.skipped.push(skip(SkipReason::InvalidSession));
                }
            }
        }
    }

    if dataset.is_empty() {
        warn!(skipped = dataset.skipped.len(), "No data downloaded");
        return None;
    }

    info!(
        laps = dataset.len(),
        skipped = dataset.skipped.len(),
        "Season dataset built"
    );
    Some(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventFormat, RawSession, ScheduledEvent};
    use crate::test_support::raw_lap;
    use anyhow::{Result, anyhow};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeProvider {
        schedules: HashMap<i32, Vec<ScheduledEvent>>,
        sessions: HashMap<(i32, String), RawSession>,
        requested: Mutex<Vec<(i32, String, SessionKind)>>,
    }

    impl FakeProvider {
        fn event(mut self, year: i32, name: &str, format: EventFormat, laps: Option<RawSession>) -> Self {
            self.schedules.entry(year).or_default().push(ScheduledEvent {
                name: name.to_string(),
                format,
            });
            if let Some(session) = laps {
                self.sessions.insert((year, name.to_string()), session);
            }
            self
        }
    }

    #[async_trait::async_trait]
    impl RaceDataProvider for FakeProvider {
        async fn schedule(&self, year: i32) -> Result<Vec<ScheduledEvent>> {
            self.schedules
                .get(&year)
                .cloned()
                .ok_or_else(|| anyhow!("no schedule for {year}"))
        }

        async fn session(&self, year: i32, event_name: &str, kind: SessionKind) -> Result<RawSession> {
            self.requested
                .lock()
                .unwrap()
                .push((year, event_name.to_string(), kind));
            self.sessions
                .get(&(year, event_name.to_string()))
                .cloned()
                .ok_or_else(|| anyhow!("no session for {event_name}"))
        }
    }

    fn session(driver: &str, lap_time: f64) -> RawSession {
        RawSession {
            laps: vec![
                raw_lap(driver, 1, lap_time, 1, 100.0),
                raw_lap(driver, 2, lap_time, 1, 200.0),
            ],
            weather: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_no_years_is_no_data() {
        let provider = FakeProvider::default();
        assert!(build_season(&provider, &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_only_conventional_races_are_transformed() {
        let provider = FakeProvider::default()
            .event(2023, "Bahrain Grand Prix", EventFormat::Conventional, Some(session("VER", 95.0)))
            .event(2023, "Azerbaijan Grand Prix", EventFormat::Sprint, Some(session("PER", 105.0)))
            .event(2023, "Pre-Season Testing", EventFormat::Testing, None);

        let dataset = build_season(&provider, &[2023]).await.unwrap();

        assert_eq!(dataset.len(), 2);
        assert!(dataset.laps.iter().all(|l| l.track_id == "bahrain"));
        let requested = provider.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec![(2023, "Bahrain Grand Prix".to_string(), SessionKind::Race)]
        );
    }

    #[tokio::test]
    async fn test_invalid_session_excluded_others_kept() {
        let provider = FakeProvider::default()
            .event(2023, "Bahrain Grand Prix", EventFormat::Conventional, Some(session("VER", 95.0)))
            .event(2023, "Monaco Grand Prix", EventFormat::Conventional, Some(session("LEC", 500.0)))
            .event(2023, "Spanish Grand Prix", EventFormat::Conventional, Some(session("ALO", 80.0)));

        let dataset = build_season(&provider, &[2023]).await.unwrap();

        let events: Vec<&str> = dataset.laps.iter().map(|l| l.event_name.as_str()).collect();
        assert_eq!(
            events,
            vec![
                "Bahrain Grand Prix",
                "Bahrain Grand Prix",
                "Spanish Grand Prix",
                "Spanish Grand Prix"
            ]
        );
        assert_eq!(dataset.skipped.len(), 1);
        assert_eq!(dataset.skipped[0].event_name, "Monaco Grand Prix");
        assert_eq!(dataset.skipped[0].reason, SkipReason::NoUsableData);
    }

    #[tokio::test]
    async fn test_failed_schedule_skips_only_that_year() {
        let provider = FakeProvider::default().event(
            2024,
            "Bahrain Grand Prix",
            EventFormat::Conventional,
            Some(session("VER", 95.0)),
        );

        let dataset = build_season(&provider, &[2023, 2024]).await.unwrap();
        assert!(dataset.laps.iter().all(|l| l.season == 2024));
    }

    #[tokio::test]
    async fn test_provider_and_identity_failures_are_recorded() {
        let mut broken = session("VER", 95.0);
        broken.laps[1].driver = None;
        let provider = FakeProvider::default()
            .event(2023, "Bahrain Grand Prix", EventFormat::Conventional, None)
            .event(2023, "Miami Grand Prix", EventFormat::Conventional, Some(broken))
            .event(2023, "Monaco Grand Prix", EventFormat::Conventional, Some(session("LEC", 75.0)));

        let dataset = build_season(&provider, &[2023]).await.unwrap();

        let reasons: Vec<SkipReason> = dataset.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![SkipReason::ProviderFailure, SkipReason::InvalidSession]
        );
        assert_eq!(dataset.len(), 2);
    }

    #[tokio::test]
    async fn test_all_sessions_empty_is_no_data() {
        let provider = FakeProvider::default().event(
            2023,
            "Monaco Grand Prix",
            EventFormat::Conventional,
            Some(session("LEC", 10.0)),
        );
        assert!(build_season(&provider, &[2023]).await.is_none());
    }
}
