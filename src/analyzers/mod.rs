//! Summaries and quality checks over enriched lap data.
//!
//! This module groups laps into per-race summaries, builds a dataset quality
//! report, reads lap tables back from disk and uploads outputs to S3.

pub mod aggregate;
pub mod analyzer;
pub mod types;
pub mod utility;
pub mod writetos3;
