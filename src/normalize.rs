//! Canonical identifiers for tracks and tyre compounds.
//!
//! Both normalizers are total: free-text input never produces an error, only
//! a best-effort key that is stable across seasons and safe to join on.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lookup-stable track key such as `monaco` or `great_britain`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for TrackId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Canonical tyre compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl Compound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compound::Soft => "soft",
            Compound::Medium => "medium",
            Compound::Hard => "hard",
            Compound::Intermediate => "intermediate",
            Compound::Wet => "wet",
            Compound::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static EVENT_NAMES: &[(&str, &str)] = &[
    ("Bahrain Grand Prix", "bahrain"),
    ("Saudi Arabian Grand Prix", "saudi_arabia"),
    ("Australian Grand Prix", "australia"),
    ("Japanese Grand Prix", "japan"),
    ("Chinese Grand Prix", "china"),
    ("Miami Grand Prix", "miami"),
    ("Monaco Grand Prix", "monaco"),
    ("Spanish Grand Prix", "spain"),
    ("Canadian Grand Prix", "canada"),
    ("Austrian Grand Prix", "austria"),
    ("British Grand Prix", "great_britain"),
    ("Hungarian Grand Prix", "hungary"),
    ("Belgian Grand Prix", "belgium"),
    ("Dutch Grand Prix", "netherlands"),
    ("Italian Grand Prix", "italy"),
    ("Singapore Grand Prix", "singapore"),
    ("United States Grand Prix", "united_states"),
    ("Mexican Grand Prix", "mexico"),
    ("Brazilian Grand Prix", "brazil"),
    ("Las Vegas Grand Prix", "las_vegas"),
    ("Qatar Grand Prix", "qatar"),
    ("Abu Dhabi Grand Prix", "abu_dhabi"),
];

static EVENT_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| EVENT_NAMES.iter().copied().collect());

static COMPOUND_MAP: Lazy<HashMap<&'static str, Compound>> = Lazy::new(|| {
    HashMap::from([
        ("SOFT", Compound::Soft),
        ("MEDIUM", Compound::Medium),
        ("HARD", Compound::Hard),
        ("INTERMEDIATE", Compound::Intermediate),
        ("WET", Compound::Wet),
        ("UNKNOWN", Compound::Unknown),
    ])
});

const GRAND_PRIX_SUFFIX: &str = " grand prix";

/// Maps a free-text event name to a canonical track id.
pub fn normalize_track(event_name: &str) -> TrackId {
    if let Some(id) = EVENT_MAP.get(event_name) {
        return TrackId((*id).to_string());
    }

    let lowered = event_name.trim().to_lowercase();
    let stem = lowered.strip_suffix(GRAND_PRIX_SUFFIX).unwrap_or(&lowered);
    let id = stem.replace(' ', "_");
    let id = id.trim_matches('_');

    if id.is_empty() {
        TrackId("unknown".to_string())
    } else {
        TrackId(id.to_string())
    }
}

/// Maps a recorded compound label to a canonical compound.
///
/// Labels are trimmed and upper-cased before lookup, so `"soft"` and
/// `" SOFT "` both map to [`Compound::Soft`].
pub fn normalize_compound(raw: Option<&str>) -> Compound {
    let label = raw.map(str::trim).unwrap_or("UNKNOWN").to_uppercase();
    COMPOUND_MAP
        .get(label.as_str())
        .copied()
        .unwrap_or(Compound::Unknown)
}
