use crate::analyzers::types::DatasetReport;
use crate::model::LapRecord;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Reads a lap table written by [`crate::output::save_dataset`].
///
/// Files ending in `.gz` are decompressed on the fly.
pub fn load_laps(path: &Path) -> Result<Vec<LapRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut rdr = csv::Reader::from_reader(reader);
    let mut laps = Vec::new();
    for result in rdr.deserialize() {
        let record: LapRecord = result.with_context(|| format!("bad row in {}", path.display()))?;
        laps.push(record);
    }

    Ok(laps)
}

/// Loads a lap table and builds its quality report.
pub fn analyze(path: &Path) -> Result<DatasetReport> {
    let laps = load_laps(path)?;
    info!(path = %path.display(), laps = laps.len(), "Lap table loaded");
    Ok(DatasetReport::from_laps(&laps))
}
