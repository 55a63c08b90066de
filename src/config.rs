//! Provider settings resolved from CLI flags and the environment.
//!
//! `.env` files are loaded by the binary through `dotenvy` before these are
//! read.

use anyhow::Result;

use crate::infra::provider_for;
use crate::services::RaceDataProvider;

pub const SOURCE_ENV: &str = "LAPWISE_SOURCE";
pub const API_KEY_ENV: &str = "LAPWISE_API_KEY";
/// Directory provider root used when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "raw";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base URL (`http...`) or directory holding the provider layout.
    pub source: String,
    /// Bearer token for HTTP mirrors.
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Resolves settings: the CLI flag wins over `LAPWISE_SOURCE`.
    pub fn resolve(cli_source: Option<String>) -> Self {
        Self::from_lookup(cli_source, |key| std::env::var(key).ok())
    }

    fn from_lookup(cli_source: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let source = non_empty(cli_source)
            .or_else(|| non_empty(lookup(SOURCE_ENV)))
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        Self {
            source,
            api_key: non_empty(lookup(API_KEY_ENV)),
        }
    }

    pub fn provider(&self) -> Result<Box<dyn RaceDataProvider>> {
        provider_for(&self.source, self.api_key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::from_lookup(None, env(&[]));
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_cli_overrides_env() {
        let lookup = env(&[(SOURCE_ENV, "https://mirror.example"), (API_KEY_ENV, "k")]);
        let config = ProviderConfig::from_lookup(Some("local".to_string()), lookup);
        assert_eq!(config.source, "local");
        assert_eq!(config.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_blank_values_ignored() {
        let config = ProviderConfig::from_lookup(Some(" ".to_string()), env(&[(API_KEY_ENV, "")]));
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.api_key, None);
    }
}
