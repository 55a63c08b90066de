//! Concrete race-data providers.
//!
//! [`HttpMirror`] fetches the provider layout over HTTP through the
//! [`crate::fetch::HttpClient`] seam; [`DirectoryMirror`] reads the same
//! layout from disk.

mod directory;
mod http_mirror;

pub use directory::DirectoryMirror;
pub use http_mirror::HttpMirror;

use anyhow::Result;

use crate::services::RaceDataProvider;

/// Picks a provider for `source`: URLs go over HTTP, anything else is a
/// directory.
pub fn provider_for(source: &str, api_key: Option<&str>) -> Result<Box<dyn RaceDataProvider>> {
    if source.starts_with("http") {
        Ok(Box::new(HttpMirror::connect(source, api_key)?))
    } else {
        Ok(Box::new(DirectoryMirror::new(source)))
    }
}
