use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use olympic_lens::config::DashboardConfig;
use olympic_lens::data::loader::load_dataset;
use olympic_lens::state::{AthletesPage, DashboardState, MedalsPage, OverviewPage};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    regions: &'a BTreeSet<Option<String>>,
    sports: &'a BTreeSet<String>,
    years: Option<(i32, i32)>,
    medals: MedalsPage,
    overview: OverviewPage,
    athletes: AthletesPage<'a>,
}

/// Headless dashboard: load the dataset once and print every page as JSON.
///
/// Usage: `olympic-lens [config.json]`
fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::load(config_path.as_deref())?;
    log::debug!("Using {config:?}");

    let dataset = load_dataset(&config.athlete_events, &config.noc_regions).with_context(|| {
        format!(
            "loading {} and {}",
            config.athlete_events.display(),
            config.noc_regions.display()
        )
    })?;
    let state = DashboardState::new(dataset, &config);

    let report = Report {
        regions: state.region_options(),
        sports: state.sport_options(),
        years: state.year_scale(),
        medals: state.medals_page(),
        overview: state.overview_page(),
        athletes: state.athletes_page(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
