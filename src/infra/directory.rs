use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::model::{RawSession, ScheduledEvent, SessionKind};
use crate::parser::{parse_schedule, parse_session};
use crate::services::race_data::{RaceDataProvider, schedule_path, session_path};

/// Reads schedules and sessions from a local copy of the provider layout.
pub struct DirectoryMirror {
    root: PathBuf,
}

impl DirectoryMirror {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.root.join(relative);
        debug!(path = %path.display(), "Reading provider file");
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))
    }
}

#[async_trait]
impl RaceDataProvider for DirectoryMirror {
    async fn schedule(&self, year: i32) -> Result<Vec<ScheduledEvent>> {
        let bytes = self.read(&schedule_path(year)).await?;
        Ok(parse_schedule(&bytes)?)
    }

    async fn session(&self, year: i32, event_name: &str, kind: SessionKind) -> Result<RawSession> {
        let bytes = self.read(&session_path(year, event_name, kind)).await?;
        Ok(parse_session(&bytes)?)
    }
}
