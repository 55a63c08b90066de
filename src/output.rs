//! Output formatting and persistence for enriched lap data.
//!
//! Writes the lap table and the circuit table as CSV and race summaries as
//! JSON, each optionally gzip-compressed.

use anyhow::{Context, Result};
use chrono::Utc;
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::aggregate::race_summaries;
use crate::analyzers::types::RaceSummaryIndex;
use crate::model::SeasonDataset;
use crate::registry::circuits;

pub const LAPS_FILE: &str = "laps.csv";
pub const CIRCUITS_FILE: &str = "circuits.csv";
pub const SUMMARY_FILE: &str = "race_summary.json";

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A file being written, plain or gzip-compressed.
enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Sink {
    fn create(path: &Path, gzip: bool) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let buffered = BufWriter::new(file);
        Ok(if gzip {
            Sink::Gzip(GzEncoder::new(buffered, Compression::default()))
        } else {
            Sink::Plain(buffered)
        })
    }

    fn finish(self) -> Result<()> {
        let mut buffered = match self {
            Sink::Plain(buffered) => buffered,
            Sink::Gzip(encoder) => encoder.finish()?,
        };
        buffered.flush()?;
        Ok(())
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
        }
    }
}

fn output_path(dir: &Path, name: &str, gzip: bool) -> PathBuf {
    if gzip {
        dir.join(format!("{name}.gz"))
    } else {
        dir.join(name)
    }
}

/// Writes `rows` as a CSV file with a header row.
pub fn write_csv<T, I>(path: &Path, rows: I, gzip: bool) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_writer(Sink::create(path, gzip)?);

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }

    let sink = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush {}: {}", path.display(), e.error()))?;
    sink.finish()?;

    debug!(path = %path.display(), rows = count, "CSV written");
    Ok(count)
}

/// Writes `value` as pretty JSON.
pub fn write_json(path: &Path, value: &impl Serialize, gzip: bool) -> Result<()> {
    let mut sink = Sink::create(path, gzip)?;
    serde_json::to_writer_pretty(&mut sink, value)?;
    sink.finish()
}

/// Persists a season dataset into `dir` and returns the written paths.
///
/// Writes the lap table, the circuit registry and per-race summaries.
pub fn save_dataset(dir: &Path, dataset: &SeasonDataset, gzip: bool) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let laps_path = output_path(dir, LAPS_FILE, gzip);
    let laps = write_csv(&laps_path, &dataset.laps, gzip)?;

    let circuits_path = output_path(dir, CIRCUITS_FILE, gzip);
    write_csv(&circuits_path, circuits(), gzip)?;

    let summary_path = output_path(dir, SUMMARY_FILE, gzip);
    let index = RaceSummaryIndex {
        generated_at: Utc::now(),
        races: race_summaries(&dataset.laps),
    };
    write_json(&summary_path, &index, gzip)?;

    info!(
        laps,
        races = index.races.len(),
        dir = %dir.display(),
        "Dataset saved"
    );
    Ok(vec![laps_path, circuits_path, summary_path])
}
