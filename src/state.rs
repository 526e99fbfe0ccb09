use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::filter::{Filter, RegionFilter, SeasonFilter, SportFilter, YearRange};
use crate::data::medals::{self, RegionMedals, YearRegionMedals};
use crate::data::model::{OlympicDataset, ParticipationRecord};
use crate::data::participation::{
    self, DistinctCounts, LabelCount, RegionAthletes, RegionSort, SexComposition, SportsInYear,
    YearCount,
};
use crate::data::ranking::{self, AthleteMedals, AthleteSelection};

// ---------------------------------------------------------------------------
// Page views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MedalsPage {
    pub years: YearRange,
    pub table: Vec<RegionMedals>,
    pub trend: Vec<YearRegionMedals>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewPage {
    pub counts: DistinctCounts,
    pub participants_per_year: Vec<YearCount>,
    pub host_cities: Vec<LabelCount>,
    pub seasons: Vec<LabelCount>,
    pub sports_per_year: Vec<YearCount>,
    pub sport_lists: Vec<SportsInYear>,
    pub athletes_per_region: Vec<RegionAthletes>,
    pub participations_per_edition: Vec<LabelCount>,
    pub games_per_committee: Vec<LabelCount>,
    pub top_athletes: Vec<AthleteMedals>,
    pub sex_composition: Vec<SexComposition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AthletesPage<'a> {
    pub selection: AthleteSelection<'a>,
    pub sport_participation: Vec<LabelCount>,
    /// Present only when a single sport is selected.
    pub top_sport_athletes: Option<Vec<AthleteMedals>>,
    pub sport_sex_composition: Option<Vec<SexComposition>>,
    pub height_weight: Option<Vec<&'a ParticipationRecord>>,
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Current selections over the loaded dataset, independent of rendering.
/// Every page is recomputed from the dataset on request.
pub struct DashboardState {
    pub dataset: OlympicDataset,
    pub region: RegionFilter,
    pub season: SeasonFilter,
    pub sport: SportFilter,
    pub years: YearRange,
    pub region_sort: RegionSort,
    pub region_sort_ascending: bool,
    pub top_athletes: usize,
    pub top_sport_athletes: usize,
}

impl DashboardState {
    /// Ingest a loaded dataset with the configured initial selections.
    pub fn new(dataset: OlympicDataset, config: &DashboardConfig) -> Self {
        let sport = match &config.sport {
            Some(s) => Filter::Exactly(s.clone()),
            None => Filter::Any,
        };
        Self {
            dataset,
            region: Filter::Any,
            season: Filter::Any,
            sport,
            years: config.years(),
            region_sort: RegionSort::default(),
            region_sort_ascending: true,
            top_athletes: config.top_athletes,
            top_sport_athletes: config.top_sport_athletes,
        }
    }

    /// Region selector choices, including the unmapped bucket.
    pub fn region_options(&self) -> &BTreeSet<Option<String>> {
        &self.dataset.regions
    }

    pub fn sport_options(&self) -> &BTreeSet<String> {
        &self.dataset.sports
    }

    /// Bounds of the year slider, `None` for an empty dataset.
    pub fn year_scale(&self) -> Option<(i32, i32)> {
        self.dataset.year_span
    }

    pub fn set_years(&mut self, from: i32, to: i32) {
        self.years = YearRange::new(from, to);
    }

    pub fn medals_page(&self) -> MedalsPage {
        let rows = &self.dataset.records;
        MedalsPage {
            years: self.years,
            table: medals::filtered_medal_totals(rows, &self.region, &self.season, self.years),
            trend: medals::region_medal_trend(rows, &self.region, self.years),
        }
    }

    pub fn overview_page(&self) -> OverviewPage {
        let rows = &self.dataset.records;
        OverviewPage {
            counts: participation::distinct_counts(rows),
            participants_per_year: participation::participants_per_year(rows),
            host_cities: participation::host_city_counts(rows),
            seasons: participation::season_counts(rows),
            sports_per_year: participation::sport_count_per_year(rows),
            sport_lists: participation::sport_list_per_year(rows),
            athletes_per_region: participation::athletes_per_region(
                rows,
                self.region_sort,
                self.region_sort_ascending,
            ),
            participations_per_edition: participation::athletes_per_games_edition(rows),
            games_per_committee: participation::games_per_committee(rows),
            top_athletes: ranking::top_athletes_by_medals(rows, self.top_athletes),
            sex_composition: participation::sex_composition_by_year(rows, &Filter::Any),
        }
    }

    pub fn athletes_page(&self) -> AthletesPage<'_> {
        let rows = &self.dataset.records;
        let selection = ranking::filter_athletes(rows, self.years, &self.region, &self.sport);
        let sport_participation = participation::sport_participation(selection.rows.iter().copied());

        let (top_sport_athletes, sport_sex_composition, height_weight) = match &self.sport {
            Filter::Exactly(sport) => (
                Some(ranking::top_athletes_by_sport_and_year(
                    rows,
                    sport,
                    self.years.to,
                    self.top_sport_athletes,
                )),
                Some(participation::sex_composition_by_year(rows, &self.sport)),
                Some(ranking::height_weight_by_sport_and_region(rows, sport, &self.region)),
            ),
            Filter::Any => (None, None, None),
        };

        AthletesPage {
            selection,
            sport_participation,
            top_sport_athletes,
            sport_sex_composition,
            height_weight,
        }
    }
}
