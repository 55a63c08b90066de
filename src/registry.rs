//! Static circuit facts keyed by canonical track id.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pit-lane loss used when a track is missing from the registry.
pub const DEFAULT_PIT_LOSS_SECS: f64 = 20.0;
/// Circuit length used when a track is missing from the registry.
pub const DEFAULT_TRACK_LENGTH_KM: f64 = 5.0;

/// Circuit facts copied onto every lap of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackMeta {
    pub pit_loss_time: f64,
    pub track_length_km: f64,
}

impl TrackMeta {
    pub const FALLBACK: TrackMeta = TrackMeta {
        pit_loss_time: DEFAULT_PIT_LOSS_SECS,
        track_length_km: DEFAULT_TRACK_LENGTH_KM,
    };
}

/// One row of the `circuits` table.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitRow<'a> {
    pub track_id: &'a str,
    pub pit_loss_time: f64,
    pub track_length_km: f64,
}

static TRACK_META: &[(&str, f64, f64)] = &[
    ("bahrain", 22.0, 5.412),
    ("saudi_arabia", 24.0, 6.174),
    ("australia", 23.0, 5.278),
    ("japan", 19.0, 5.807),
    ("china", 22.0, 5.451),
    ("miami", 18.0, 5.410),
    ("monaco", 16.0, 3.337),
    ("spain", 21.0, 4.655),
    ("canada", 15.0, 4.361),
    ("austria", 18.0, 4.318),
    ("great_britain", 20.0, 5.891),
    ("hungary", 19.0, 4.381),
    ("belgium", 17.0, 7.004),
    ("netherlands", 20.0, 4.259),
    ("italy", 19.0, 5.793),
    ("singapore", 22.0, 5.063),
    ("united_states", 20.0, 5.513),
    ("mexico", 18.0, 4.304),
    ("brazil", 19.0, 4.309),
    ("las_vegas", 14.0, 6.120),
    ("qatar", 18.0, 5.419),
    ("abu_dhabi", 20.0, 5.554),
];

static REGISTRY: Lazy<BTreeMap<&'static str, TrackMeta>> = Lazy::new(|| {
    TRACK_META
        .iter()
        .map(|&(id, pit_loss_time, track_length_km)| {
            (
                id,
                TrackMeta {
                    pit_loss_time,
                    track_length_km,
                },
            )
        })
        .collect()
});

/// Looks up a track by canonical id.
pub fn track_meta(track_id: &str) -> Option<TrackMeta> {
    REGISTRY.get(track_id).copied()
}

/// Like [`track_meta`] but falls back to [`TrackMeta::FALLBACK`].
pub fn track_meta_or_default(track_id: &str) -> TrackMeta {
    track_meta(track_id).unwrap_or(TrackMeta::FALLBACK)
}

/// Registry rows ordered by track id.
pub fn circuits() -> impl Iterator<Item = CircuitRow<'static>> {
    REGISTRY.iter().map(|(id, meta)| CircuitRow {
        track_id: id,
        pit_loss_time: meta.pit_loss_time,
        track_length_km: meta.track_length_km,
    })
}
