use lapwise::analyzers::analyzer::{analyze, load_laps};
use lapwise::build_season;
use lapwise::infra::DirectoryMirror;
use lapwise::output::save_dataset;
use lapwise::{Compound, SessionKind};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

fn fresh_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
}

/// Two stints of a driver, one pit stop after lap 6, with a slow lap 4.
fn bahrain_race() -> Value {
    let mut laps = Vec::new();
    for (driver, base) in [("VER", 95.0), ("LEC", 96.0)] {
        let mut elapsed = 3600.0;
        for lap in 1..=10 {
            let lap_time = if lap == 4 { base * 1.5 } else { base };
            elapsed += lap_time;
            let (stint, compound) = if lap <= 6 { (1, "SOFT") } else { (2, " hard ") };
            laps.push(json!({
                "Driver": driver,
                "LapNumber": lap as f64,
                "LapTime": lap_time,
                "Sector1Time": lap_time / 3.0,
                "Sector2Time": lap_time / 3.0,
                "Sector3Time": lap_time / 3.0,
                "Compound": compound,
                "Stint": stint as f64,
                "Time": elapsed,
            }));
        }
    }
    // Out-of-range lap time, never reaches the dataset.
    laps.push(json!({"Driver": "SAR", "LapNumber": 1.0, "LapTime": 12.0, "Stint": 1.0, "Time": 3700.0}));

    json!({
        "laps": laps,
        "weather": [
            {"Time": "0 days 00:00:00", "AirTemp": 28.0, "TrackTemp": 35.0, "Humidity": 40.0, "Rainfall": false},
            {"Time": "0 days 01:05:00", "AirTemp": 27.0, "TrackTemp": 33.0, "Humidity": 42.0, "Rainfall": 0},
        ],
    })
}

fn seed_provider(root: &Path) {
    write_json(
        &root.join("2023/schedule.json"),
        &json!([
            {"EventName": "Pre-Season Testing", "EventFormat": "testing"},
            {"EventName": "Bahrain Grand Prix", "EventFormat": "conventional"},
            {"EventName": "Azerbaijan Grand Prix", "EventFormat": "sprint_shootout"},
            {"EventName": "Monaco Grand Prix", "EventFormat": "conventional"},
        ]),
    );
    write_json(&root.join("2023/bahrain/R.json"), &bahrain_race());
    write_json(
        &root.join("2023/azerbaijan/R.json"),
        &json!({"laps": [{"Driver": "PER", "LapNumber": 1.0, "LapTime": 105.0, "Stint": 1.0}]}),
    );
    // Every lap outside the accepted range.
    write_json(
        &root.join("2023/monaco/R.json"),
        &json!({"laps": [
            {"Driver": "LEC", "LapNumber": 1.0, "LapTime": 400.0, "Stint": 1.0},
            {"Driver": "LEC", "LapNumber": 2.0, "LapTime": null, "Stint": 1.0},
        ]}),
    );
}

#[tokio::test]
async fn test_full_pipeline() {
    let root = fresh_dir("lapwise_it_provider");
    let out = fresh_dir("lapwise_it_output");
    seed_provider(&root);

    let provider = DirectoryMirror::new(&root);
    let dataset = build_season(&provider, &[2023]).await.unwrap();

    assert_eq!(dataset.len(), 20);
    assert_eq!(dataset.skipped.len(), 1);
    assert_eq!(dataset.skipped[0].event_name, "Monaco Grand Prix");

    for lap in &dataset.laps {
        assert_eq!(lap.track_id, "bahrain");
        assert_eq!(lap.session_kind, SessionKind::Race);
        let time = lap.lap_time.unwrap();
        assert!(time > 30.0 && time < 300.0);
        assert_eq!(lap.pit_loss_time, 22.0);
        assert_eq!(lap.track_length_km, 5.412);
        assert!(lap.air_temp.is_some());
        assert_eq!(lap.rainfall, Some(false));
    }

    // Stint laps restart at each stint and fuel follows them.
    let ver: Vec<_> = dataset.laps.iter().filter(|l| l.driver == "VER").collect();
    let stint_laps: Vec<_> = ver.iter().map(|l| l.stint_lap.unwrap()).collect();
    assert_eq!(stint_laps, vec![1, 2, 3, 4, 5, 6, 1, 2, 3, 4]);
    assert_eq!(ver[0].fuel_estimate, Some(98.0));
    assert_eq!(ver[0].compound, Compound::Soft);
    assert_eq!(ver[9].compound, Compound::Hard);

    // The slow lap sits inside the rolling window and beats 1.2x the median.
    assert!(ver[3].is_safety_car);
    assert!(!ver[3].is_outlier);
    assert!(!ver[0].is_safety_car && !ver[9].is_safety_car);

    // Weather switches to the second sample once session time passes 65 min.
    assert_eq!(ver[0].air_temp, Some(28.0));
    assert_eq!(ver[9].air_temp, Some(27.0));

    let paths = save_dataset(&out, &dataset, false).unwrap();
    assert_eq!(paths.len(), 3);

    let loaded = load_laps(&out.join("laps.csv")).unwrap();
    assert_eq!(loaded, dataset.laps);

    let report = analyze(&out.join("laps.csv")).unwrap();
    assert_eq!(report.total_laps, 20);
    assert_eq!(report.races, 1);
    assert_eq!(report.drivers, 2);
    assert_eq!(report.safety_car_laps, 2);

    fs::remove_dir_all(&root).unwrap();
    fs::remove_dir_all(&out).unwrap();
}

#[tokio::test]
async fn test_no_usable_data_anywhere() {
    let root = fresh_dir("lapwise_it_empty");
    write_json(
        &root.join("2023/schedule.json"),
        &json!([{"name": "Monaco Grand Prix", "format": "conventional"}]),
    );
    write_json(
        &root.join("2023/monaco/R.json"),
        &json!({"laps": [{"driver": "LEC", "lap_number": 1, "lap_time": 12.0}]}),
    );

    let provider = DirectoryMirror::new(&root);
    assert!(build_season(&provider, &[2023, 2024]).await.is_none());

    fs::remove_dir_all(&root).unwrap();
}
