use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::fetch::{BasicClient, BearerAuth, HttpClient, fetch_bytes};
use crate::model::{RawSession, ScheduledEvent, SessionKind};
use crate::parser::{parse_schedule, parse_session};
use crate::services::race_data::{RaceDataProvider, schedule_path, session_path};

/// Reads schedules and sessions from an HTTP mirror of the provider layout.
pub struct HttpMirror {
    base_url: String,
    client: Box<dyn HttpClient>,
}

impl HttpMirror {
    pub fn new(base_url: &str, client: Box<dyn HttpClient>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Builds a mirror client, adding bearer auth when `api_key` is set.
    pub fn connect(base_url: &str, api_key: Option<&str>) -> Result<Self> {
        let basic = BasicClient::new()?;
        let client: Box<dyn HttpClient> = match api_key {
            Some(key) => Box::new(BearerAuth::new(basic, key)?),
            None => Box::new(basic),
        };
        Ok(Self::new(base_url, client))
    }

    fn url(&self, relative: &str) -> String {
        format!("{}/{}", self.base_url, relative)
    }
}

#[async_trait]
impl RaceDataProvider for HttpMirror {
    async fn schedule(&self, year: i32) -> Result<Vec<ScheduledEvent>> {
        let url = self.url(&schedule_path(year));
        debug!(%url, "Fetching schedule");
        let bytes = fetch_bytes(self.client.as_ref(), &url).await?;
        parse_schedule(&bytes).with_context(|| format!("schedule from {url}"))
    }

    async fn session(&self, year: i32, event_name: &str, kind: SessionKind) -> Result<RawSession> {
        let url = self.url(&session_path(year, event_name, kind));
        debug!(%url, "Fetching session");
        let bytes = fetch_bytes(self.client.as_ref(), &url).await?;
        parse_session(&bytes).with_context(|| format!("session from {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_ignores_trailing_slash() {
        let mirror = HttpMirror::connect("https://mirror.example/laps/", None).unwrap();
        assert_eq!(
            mirror.url(&schedule_path(2023)),
            "https://mirror.example/laps/2023/schedule.json"
        );
    }
}
