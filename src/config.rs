use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::YearRange;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so a config file only needs
/// the keys it overrides:
///
/// ```json
/// { "athlete_events": "data/athlete_events.parquet", "top_athletes": 10 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Athlete-events table (`.csv` or `.parquet`).
    pub athlete_events: PathBuf,
    /// NOC → region lookup table.
    pub noc_regions: PathBuf,
    /// Initial year window of the medal and athlete pages.
    pub year_from: i32,
    pub year_to: i32,
    /// Size of the overall top-athlete ranking.
    pub top_athletes: usize,
    /// Size of the per-sport top-athlete ranking.
    pub top_sport_athletes: usize,
    /// Sport preselected on the sport-specific views.
    pub sport: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            athlete_events: PathBuf::from("data/athlete_events.csv"),
            noc_regions: PathBuf::from("data/noc_regions.csv"),
            year_from: 1988,
            year_to: 2015,
            top_athletes: 20,
            top_sport_athletes: 30,
            sport: None,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config from the given path, or the defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn years(&self) -> YearRange {
        YearRange::new(self.year_from, self.year_to)
    }
}
