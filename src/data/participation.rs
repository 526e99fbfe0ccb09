use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::filter::SportFilter;
use super::group::{cardinality, count_by, distinct_by, group_reduce, sort_desc_by, sort_directed};
use super::model::{ParticipationRecord, Sex};

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// Headline cardinalities of the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistinctCounts {
    pub sports: usize,
    /// Distinct `athlete_id` values.
    pub athletes: usize,
    pub events: usize,
    /// Distinct resolved regions; the unmapped bucket is not counted.
    pub regions: usize,
    pub teams: usize,
    pub games_editions: usize,
    /// Distinct NOC codes.
    pub committees: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// A label with an occurrence count (host cities, seasons, NOC codes, sports, editions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportsInYear {
    pub year: i32,
    pub sports: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionAthletes {
    pub region: Option<String>,
    pub athletes: usize,
}

/// Sort column for [`athletes_per_region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionSort {
    #[default]
    Region,
    Count,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SexComposition {
    pub year: i32,
    pub male: usize,
    pub female: usize,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

pub fn distinct_counts(rows: &[ParticipationRecord]) -> DistinctCounts {
    DistinctCounts {
        sports: cardinality(rows, |r| r.sport.as_str()),
        athletes: cardinality(rows, |r| r.athlete_id),
        events: cardinality(rows, |r| r.event.as_str()),
        regions: cardinality(rows.iter().filter(|r| r.region.is_some()), |r| r.region.as_deref()),
        teams: cardinality(rows, |r| r.team.as_str()),
        games_editions: cardinality(rows, |r| r.games.as_str()),
        committees: cardinality(rows, |r| r.noc_code.as_str()),
    }
}

/// Number of participating regions per year, year ascending.
pub fn participants_per_year(rows: &[ParticipationRecord]) -> Vec<YearCount> {
    distinct_by(rows, |r| r.year, |r| r.region.as_deref())
        .into_iter()
        .map(|(year, regions)| YearCount {
            year,
            count: regions.iter().filter(|r| r.is_some()).count(),
        })
        .collect()
}

/// Tally how often each label appears across the per-year distinct sets.
fn tally_per_year<'a>(
    rows: &'a [ParticipationRecord],
    value: impl FnMut(&&'a ParticipationRecord) -> String,
) -> Vec<LabelCount> {
    let per_year = distinct_by(rows, |r| r.year, value);
    let counts = count_by(per_year.into_values().flatten(), |label| label.clone());
    let mut table: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    sort_desc_by(&mut table, |row| row.count);
    table
}

/// Editions hosted per city: every year contributes each of its distinct cities once.
pub fn host_city_counts(rows: &[ParticipationRecord]) -> Vec<LabelCount> {
    tally_per_year(rows, |r| r.city.clone())
}

/// Years in which each season was held.
pub fn season_counts(rows: &[ParticipationRecord]) -> Vec<LabelCount> {
    tally_per_year(rows, |r| r.season.to_string())
}

/// Distinct sport sets per year, year ascending.
pub fn sport_list_per_year(rows: &[ParticipationRecord]) -> Vec<SportsInYear> {
    distinct_by(rows, |r| r.year, |r| r.sport.clone())
        .into_iter()
        .map(|(year, sports)| SportsInYear { year, sports })
        .collect()
}

/// Number of distinct sports per year, year ascending.
pub fn sport_count_per_year(rows: &[ParticipationRecord]) -> Vec<YearCount> {
    sport_list_per_year(rows)
        .into_iter()
        .map(|s| YearCount {
            year: s.year,
            count: s.sports.len(),
        })
        .collect()
}

/// Unique athletes per region, fully sorted on every call.
pub fn athletes_per_region(
    rows: &[ParticipationRecord],
    sort: RegionSort,
    ascending: bool,
) -> Vec<RegionAthletes> {
    let mut table: Vec<RegionAthletes> = distinct_by(rows, |r| r.region.clone(), |r| r.athlete_id)
        .into_iter()
        .map(|(region, ids)| RegionAthletes {
            region,
            athletes: ids.len(),
        })
        .collect();
    // Groups already arrive in ascending region order.
    match sort {
        RegionSort::Region if ascending => {}
        RegionSort::Region => table.reverse(),
        RegionSort::Count => {
            sort_directed(&mut table, ascending, |a, b| a.athletes.cmp(&b.athletes))
        }
    }
    table
}

/// Participation rows per games edition. One athlete entered in several
/// events counts once per event.
pub fn athletes_per_games_edition(rows: &[ParticipationRecord]) -> Vec<LabelCount> {
    count_by(rows, |r| r.games.clone())
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect()
}

/// Participation rows per NOC code, most active committee first.
pub fn games_per_committee(rows: &[ParticipationRecord]) -> Vec<LabelCount> {
    let mut table: Vec<LabelCount> = count_by(rows, |r| r.noc_code.clone())
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    sort_desc_by(&mut table, |row| row.count);
    table
}

/// Participation rows per sport, most frequent first.
pub fn sport_participation<'a>(
    rows: impl IntoIterator<Item = &'a ParticipationRecord>,
) -> Vec<LabelCount> {
    let mut table: Vec<LabelCount> = count_by(rows, |r| r.sport.clone())
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    sort_desc_by(&mut table, |row| row.count);
    table
}

/// Male/female participation rows per year, optionally for one sport.
pub fn sex_composition_by_year(
    rows: &[ParticipationRecord],
    sport: &SportFilter,
) -> Vec<SexComposition> {
    let groups: BTreeMap<i32, SexComposition> = group_reduce(
        rows.iter().filter(|r| sport.matches_sport(&r.sport)),
        |r| r.year,
        |acc: &mut SexComposition, r| {
            acc.year = r.year;
            match r.sex {
                Sex::Male => acc.male += 1,
                Sex::Female => acc.female += 1,
            }
            acc.total = acc.male + acc.female;
        },
    );
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Filter;
    use crate::data::model::fixtures::record;
    use crate::data::model::Season;

    fn sample() -> Vec<ParticipationRecord> {
        let mut rows = Vec::new();
        let mut a = record(1, Some("USA"), 1956, "Swimming");
        a.city = "Melbourne".to_string();
        let mut b = record(2, Some("SWE"), 1956, "Equestrianism");
        b.city = "Stockholm".to_string();
        b.sex = Sex::Female;
        let mut c = record(3, Some("AUS"), 2000, "Swimming");
        c.city = "Sydney".to_string();
        c.games = "2000 Summer".to_string();
        let mut c2 = c.clone();
        c2.event = "Swimming Men's 400 metres Freestyle".to_string();
        let mut d = record(4, None, 2000, "Rowing");
        d.city = "Sydney".to_string();
        d.sex = Sex::Female;
        let mut e = record(5, Some("USA"), 2002, "Biathlon");
        e.city = "Salt Lake City".to_string();
        e.season = Season::Winter;
        e.games = "2002 Winter".to_string();
        let mut f = record(6, Some("USA"), 1956, "Swimming");
        f.city = "Melbourne".to_string();
        f.name = "Athlete 1".to_string();
        rows.extend([a, b, c, c2, d, e, f]);
        rows
    }

    #[test]
    fn distinct_counts_use_athlete_id() {
        let counts = distinct_counts(&sample());
        // Two athletes share a name but have different ids.
        assert_eq!(counts.athletes, 6);
        assert_eq!(counts.sports, 4);
        assert_eq!(counts.regions, 3);
        assert_eq!(counts.committees, 4);
    }

    #[test]
    fn per_year_region_counts_never_exceed_global() {
        let rows = sample();
        let global = distinct_counts(&rows).regions;
        let per_year = participants_per_year(&rows);
        assert_eq!(per_year.iter().map(|y| y.year).collect::<Vec<_>>(), vec![1956, 2000, 2002]);
        assert_eq!(per_year[0].count, 2);
        assert_eq!(per_year[1].count, 1);
        assert!(per_year.iter().all(|y| y.count <= global));
    }

    #[test]
    fn host_cities_handle_two_cities_in_one_year() {
        let table = host_city_counts(&sample());
        assert_eq!(table.len(), 4);
        assert!(table.iter().all(|c| c.count == 1));
        assert!(table.iter().any(|c| c.label == "Stockholm"));
    }

    #[test]
    fn seasons_count_years() {
        let table = season_counts(&sample());
        assert_eq!(table[0], LabelCount { label: "Summer".into(), count: 2 });
        assert_eq!(table[1], LabelCount { label: "Winter".into(), count: 1 });
    }

    #[test]
    fn sports_per_year_match_lists() {
        let rows = sample();
        let counts = sport_count_per_year(&rows);
        let lists = sport_list_per_year(&rows);
        assert_eq!(counts.len(), lists.len());
        for (c, l) in counts.iter().zip(&lists) {
            assert_eq!(c.count, l.sports.len());
        }
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn athletes_per_region_sorts_both_ways() {
        let rows = sample();
        let by_count = athletes_per_region(&rows, RegionSort::Count, false);
        assert_eq!(by_count[0].region.as_deref(), Some("USA"));
        assert_eq!(by_count[0].athletes, 3);

        let by_region = athletes_per_region(&rows, RegionSort::Region, true);
        assert_eq!(by_region[0].region, None);
        assert_eq!(by_region[1].region.as_deref(), Some("AUS"));

        let desc = athletes_per_region(&rows, RegionSort::Region, false);
        assert_eq!(desc[0].region.as_deref(), Some("USA"));
    }

    #[test]
    fn editions_count_participations_not_athletes() {
        let table = athletes_per_games_edition(&sample());
        let sydney = table.iter().find(|g| g.label == "2000 Summer").unwrap();
        assert_eq!(sydney.count, 3);
    }

    #[test]
    fn sex_composition_adds_up() {
        let rows = sample();
        let all = sex_composition_by_year(&rows, &Filter::Any);
        for y in &all {
            assert_eq!(y.male + y.female, y.total);
        }
        assert_eq!(all[0], SexComposition { year: 1956, male: 2, female: 1, total: 3 });

        let swimming = sex_composition_by_year(&rows, &SportFilter::sport("Swimming"));
        assert_eq!(swimming.len(), 2);
        assert_eq!(swimming[1].male, 2);
    }

    #[test]
    fn committees_and_sports_rank_by_count() {
        let rows = sample();
        let committees = games_per_committee(&rows);
        assert_eq!(committees[0].label, "USA");
        assert_eq!(committees[0].count, 3);

        let sports = sport_participation(&rows);
        assert_eq!(sports[0], LabelCount { label: "Swimming".into(), count: 4 });
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        let rows: Vec<ParticipationRecord> = Vec::new();
        assert_eq!(distinct_counts(&rows).athletes, 0);
        assert!(participants_per_year(&rows).is_empty());
        assert!(host_city_counts(&rows).is_empty());
        assert!(sex_composition_by_year(&rows, &Filter::Any).is_empty());
    }
}
