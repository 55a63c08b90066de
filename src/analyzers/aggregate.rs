use crate::analyzers::types::{
    CompoundCount, DatasetReport, LapTimeStats, RaceSummary, SeasonBreakdown,
};
use crate::analyzers::utility::{mean, pct, stddev};
use crate::model::LapRecord;
use crate::normalize::{Compound, TrackId};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Groups laps by (season, track, event) into [`RaceSummary`] rows.
///
/// Rows are ordered by season descending, then event name. Laps without a
/// lap time count toward `total_laps` but not toward the time columns.
pub fn race_summaries(laps: &[LapRecord]) -> Vec<RaceSummary> {
    let mut groups: HashMap<(i32, &TrackId, &str), Vec<&LapRecord>> = HashMap::new();
    for lap in laps {
        groups
            .entry((lap.season, &lap.track_id, lap.event_name.as_str()))
            .or_default()
            .push(lap);
    }

    let mut rows: Vec<RaceSummary> = groups
        .into_iter()
        .map(|((season, track_id, event_name), group)| {
            let times: Vec<f64> = group.iter().filter_map(|l| l.lap_time).collect();
            RaceSummary {
                season,
                track_id: track_id.clone(),
                event_name: event_name.to_string(),
                total_laps: group.len(),
                avg_lap: (!times.is_empty()).then(|| mean(&times)),
                fastest_lap: times.iter().copied().reduce(f64::min),
                sc_laps: group.iter().filter(|l| l.is_safety_car).count(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.season
            .cmp(&a.season)
            .then_with(|| a.event_name.cmp(&b.event_name))
    });
    rows
}

impl DatasetReport {
    /// Builds the quality report for `laps`. Empty input gives an all-zero report.
    pub fn from_laps(laps: &[LapRecord]) -> Self {
        let total_laps = laps.len();
        if total_laps == 0 {
            return Self::default();
        }

        let races: HashSet<(i32, &str)> = laps
            .iter()
            .map(|l| (l.season, l.event_name.as_str()))
            .collect();
        let drivers: HashSet<&str> = laps.iter().map(|l| l.driver.as_str()).collect();
        let tracks: HashSet<&TrackId> = laps.iter().map(|l| &l.track_id).collect();

        let missing_lap_times = laps.iter().filter(|l| l.lap_time.is_none()).count();
        let outlier_laps = laps.iter().filter(|l| l.is_outlier).count();
        let safety_car_laps = laps.iter().filter(|l| l.is_safety_car).count();

        let clean_times: Vec<f64> = laps
            .iter()
            .filter(|l| !l.is_outlier)
            .filter_map(|l| l.lap_time)
            .collect();
        let lap_times = (!clean_times.is_empty()).then(|| {
            let average = mean(&clean_times);
            LapTimeStats {
                fastest: clean_times.iter().copied().fold(f64::INFINITY, f64::min),
                average,
                slowest: clean_times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                stddev: stddev(&clean_times, average),
            }
        });

        let mut compound_counts: BTreeMap<Compound, usize> = BTreeMap::new();
        for lap in laps.iter().filter(|l| l.compound != Compound::Unknown) {
            *compound_counts.entry(lap.compound).or_insert(0) += 1;
        }
        let mut compounds: Vec<CompoundCount> = compound_counts
            .into_iter()
            .map(|(compound, laps)| CompoundCount { compound, laps })
            .collect();
        compounds.sort_by(|a, b| b.laps.cmp(&a.laps));

        let mut per_season: BTreeMap<i32, (usize, HashSet<&str>)> = BTreeMap::new();
        for lap in laps {
            let entry = per_season.entry(lap.season).or_default();
            entry.0 += 1;
            entry.1.insert(lap.event_name.as_str());
        }
        let seasons = per_season
            .into_iter()
            .rev()
            .map(|(season, (laps, events))| SeasonBreakdown {
                season,
                laps,
                races: events.len(),
            })
            .collect();

        DatasetReport {
            total_laps,
            races: races.len(),
            drivers: drivers.len(),
            tracks: tracks.len(),
            missing_lap_times,
            outlier_laps,
            safety_car_laps,
            outlier_pct: pct(outlier_laps, total_laps),
            safety_car_pct: pct(safety_car_laps, total_laps),
            lap_times,
            compounds,
            seasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_track;
    use crate::test_support::lap;

    fn race_lap(season: i32, event: &str, driver: &str, n: u32, time: f64) -> LapRecord {
        let mut record = lap(driver, n, Some(time));
        record.season = season;
        record.event_name = event.to_string();
        record.track_id = normalize_track(event);
        record
    }

    #[test]
    fn test_race_summaries_grouping_and_order() {
        let mut laps = vec![
            race_lap(2023, "Monaco Grand Prix", "LEC", 1, 75.0),
            race_lap(2023, "Monaco Grand Prix", "LEC", 2, 77.0),
            race_lap(2024, "Bahrain Grand Prix", "VER", 1, 95.0),
            race_lap(2023, "Bahrain Grand Prix", "VER", 1, 96.0),
        ];
        laps[1].is_safety_car = true;

        let rows = race_summaries(&laps);

        let keys: Vec<(i32, &str)> = rows.iter().map(|r| (r.season, r.event_name.as_str())).collect();
        assert_eq!(
            keys,
            vec![
                (2024, "Bahrain Grand Prix"),
                (2023, "Bahrain Grand Prix"),
                (2023, "Monaco Grand Prix"),
            ]
        );
        let monaco = &rows[2];
        assert_eq!(monaco.track_id, "monaco");
        assert_eq!(monaco.total_laps, 2);
        assert_eq!(monaco.avg_lap, Some(76.0));
        assert_eq!(monaco.fastest_lap, Some(75.0));
        assert_eq!(monaco.sc_laps, 1);
    }

    #[test]
    fn test_report_on_empty_input() {
        assert_eq!(DatasetReport::from_laps(&[]), DatasetReport::default());
    }

    #[test]
    fn test_report_counts() {
        let mut laps = vec![
            race_lap(2023, "Monaco Grand Prix", "LEC", 1, 70.0),
            race_lap(2023, "Monaco Grand Prix", "LEC", 2, 80.0),
            race_lap(2023, "Monaco Grand Prix", "SAI", 1, 160.0),
            race_lap(2024, "Monaco Grand Prix", "LEC", 1, 75.0),
        ];
        laps[0].compound = Compound::Soft;
        laps[1].compound = Compound::Hard;
        laps[3].compound = Compound::Hard;
        laps[2].is_outlier = true;
        laps[1].is_safety_car = true;

        let report = DatasetReport::from_laps(&laps);

        assert_eq!(report.total_laps, 4);
        assert_eq!(report.races, 2);
        assert_eq!(report.drivers, 2);
        assert_eq!(report.tracks, 1);
        assert_eq!(report.outlier_laps, 1);
        assert_eq!(report.outlier_pct, 25.0);
        assert_eq!(report.safety_car_laps, 1);

        let times = report.lap_times.unwrap();
        assert_eq!(times.fastest, 70.0);
        assert_eq!(times.slowest, 80.0);
        assert_eq!(times.average, 75.0);

        assert_eq!(
            report.compounds,
            vec![
                CompoundCount { compound: Compound::Hard, laps: 2 },
                CompoundCount { compound: Compound::Soft, laps: 1 },
            ]
        );
        assert_eq!(
            report.seasons,
            vec![
                SeasonBreakdown { season: 2024, laps: 1, races: 1 },
                SeasonBreakdown { season: 2023, laps: 3, races: 1 },
            ]
        );
    }
}
