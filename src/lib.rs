//! Season-scale lap telemetry ingestion.
//!
//! Raw laps and weather come from a [`services::RaceDataProvider`]; each
//! session is cleaned and enriched by [`session::transform_session`] and
//! seasons are assembled by [`season::build_season`].

pub mod analyzers;
pub mod anomaly;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fuel;
pub mod infra;
pub mod model;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod registry;
pub mod season;
pub mod services;
pub mod session;
pub mod weather;

#[cfg(test)]
mod test_support;

pub use error::{DecodeError, SessionError, WeatherError};
pub use model::{LapRecord, SeasonDataset, SessionKind};
pub use normalize::{Compound, TrackId, normalize_compound, normalize_track};
pub use season::build_season;
pub use session::{SessionOutcome, transform_session};
