use serde::Serialize;

use super::filter::{select_window, RegionFilter, SeasonFilter, YearRange};
use super::group::{dedup_medal_key, group_reduce, sort_desc_by, MedalCount};
use super::model::ParticipationRecord;

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// Medal tally for one region. `region` is `None` for the unmapped bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionMedals {
    pub region: Option<String>,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
}

/// Medal tally for one region in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearRegionMedals {
    pub year: i32,
    pub region: Option<String>,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
}

impl RegionMedals {
    fn new(region: Option<String>, count: MedalCount) -> Self {
        RegionMedals {
            region,
            gold: count.gold,
            silver: count.silver,
            bronze: count.bronze,
            total: count.total(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Per-region medal table, sorted by `total` descending (ties by region).
pub fn medal_totals<'a>(
    rows: impl IntoIterator<Item = &'a ParticipationRecord>,
) -> Vec<RegionMedals> {
    let groups = group_reduce(
        dedup_medal_key(rows),
        |r| r.region.clone(),
        |count: &mut MedalCount, r| count.add(r.medal),
    );
    let mut table: Vec<RegionMedals> = groups
        .into_iter()
        .map(|(region, count)| RegionMedals::new(region, count))
        .collect();
    sort_desc_by(&mut table, |row| row.total);
    table
}

/// Medal table over an inclusive year window and season, optionally narrowed
/// to one region. An unknown region gives an empty table.
pub fn filtered_medal_totals(
    rows: &[ParticipationRecord],
    region: &RegionFilter,
    season: &SeasonFilter,
    years: YearRange,
) -> Vec<RegionMedals> {
    if years.is_empty() {
        return Vec::new();
    }
    let mut table = medal_totals(select_window(rows, years, season));
    if let RegionFilter::Exactly(wanted) = region {
        table.retain(|row| &row.region == wanted);
    }
    log::debug!(
        "medal table for {region:?} {season:?} {}..={}: {} rows",
        years.from,
        years.to,
        table.len()
    );
    table
}

/// Medal tallies grouped by (year, region), ordered by year then region.
pub fn yearly_region_medals<'a>(
    rows: impl IntoIterator<Item = &'a ParticipationRecord>,
) -> Vec<YearRegionMedals> {
    group_reduce(
        dedup_medal_key(rows),
        |r| (r.year, r.region.clone()),
        |count: &mut MedalCount, r| count.add(r.medal),
    )
    .into_iter()
    .map(|((year, region), count)| YearRegionMedals {
        year,
        region,
        gold: count.gold,
        silver: count.silver,
        bronze: count.bronze,
        total: count.total(),
    })
    .collect()
}

/// Medal trend of one region inside a year window, year ascending.
/// Without a selected region there is no single trend and the result is empty.
pub fn region_medal_trend(
    rows: &[ParticipationRecord],
    region: &RegionFilter,
    years: YearRange,
) -> Vec<YearRegionMedals> {
    if region.is_any() || years.is_empty() {
        return Vec::new();
    }
    let mut trend = yearly_region_medals(rows);
    trend.retain(|row| years.contains(row.year) && region.matches(&row.region));
    trend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Filter;
    use crate::data::model::fixtures::{record, with_medal};
    use crate::data::model::{Medal, Season};

    fn sample() -> Vec<ParticipationRecord> {
        let mut rows = vec![
            with_medal(record(1, Some("USA"), 2000, "Swimming"), Medal::Gold),
            with_medal(record(2, Some("USA"), 2004, "Rowing"), Medal::Silver),
            with_medal(record(3, Some("FRA"), 2000, "Judo"), Medal::Bronze),
            with_medal(record(4, Some("FRA"), 2000, "Fencing"), Medal::Gold),
            with_medal(record(5, Some("FRA"), 2004, "Fencing"), Medal::Gold),
            with_medal(record(6, None, 2000, "Judo"), Medal::Bronze),
            record(7, Some("KEN"), 2000, "Athletics"),
        ];
        let mut winter = with_medal(record(8, Some("USA"), 2002, "Biathlon"), Medal::Gold);
        winter.season = Season::Winter;
        rows.push(winter);
        rows
    }

    #[test]
    fn relay_rows_count_once() {
        let a = with_medal(record(1, Some("USA"), 2000, "Swimming"), Medal::Gold);
        let relay_row = a.clone();
        let table = medal_totals(&vec![a, relay_row]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].gold, 1);
        assert_eq!(table[0].total, 1);
    }

    #[test]
    fn totals_sorted_descending_and_keep_unmapped_bucket() {
        let table = medal_totals(&sample());
        let regions: Vec<_> = table.iter().map(|r| r.region.as_deref()).collect();
        assert_eq!(regions, vec![Some("FRA"), Some("USA"), None, Some("KEN")]);
        assert_eq!(table[0].gold, 2);
        assert_eq!(table[0].bronze, 1);
        assert_eq!(table[3].total, 0);
        for row in &table {
            assert_eq!(row.total, row.gold + row.silver + row.bronze);
        }
    }

    #[test]
    fn unknown_region_gives_empty_table() {
        let table = filtered_medal_totals(
            &sample(),
            &RegionFilter::region("Atlantis"),
            &Filter::Any,
            YearRange::new(1896, 2016),
        );
        assert!(table.is_empty());
    }

    #[test]
    fn inverted_window_gives_empty_table() {
        let table = filtered_medal_totals(&sample(), &Filter::Any, &Filter::Any, YearRange::new(2004, 2000));
        assert!(table.is_empty());
    }

    #[test]
    fn season_and_window_narrow_the_table() {
        let rows = sample();
        let table = filtered_medal_totals(
            &rows,
            &RegionFilter::region("USA"),
            &Filter::Exactly(Season::Summer),
            YearRange::new(2000, 2002),
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].gold, 1);
        assert_eq!(table[0].silver, 0);
    }

    #[test]
    fn all_regions_partition_into_single_region_calls() {
        let rows = sample();
        let years = YearRange::new(2000, 2004);
        let all: u32 = filtered_medal_totals(&rows, &Filter::Any, &Filter::Any, years)
            .iter()
            .map(|r| r.total)
            .sum();
        let regions: std::collections::BTreeSet<_> = rows.iter().map(|r| r.region.clone()).collect();
        let split: u32 = regions
            .into_iter()
            .flat_map(|region| filtered_medal_totals(&rows, &Filter::Exactly(region), &Filter::Any, years))
            .map(|r| r.total)
            .sum();
        assert_eq!(all, split);
        assert_eq!(all, 7);
    }

    #[test]
    fn yearly_table_groups_by_year_and_region() {
        let table = yearly_region_medals(&sample());
        let fra_2000 = table
            .iter()
            .find(|r| r.year == 2000 && r.region.as_deref() == Some("FRA"))
            .unwrap();
        assert_eq!(fra_2000.gold, 1);
        assert_eq!(fra_2000.bronze, 1);
        assert_eq!(fra_2000.total, 2);
        assert!(table.windows(2).all(|w| w[0].year <= w[1].year));
    }

    #[test]
    fn trend_is_limited_to_region_and_window() {
        let trend = region_medal_trend(&sample(), &RegionFilter::region("USA"), YearRange::new(2001, 2010));
        let years: Vec<_> = trend.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2002, 2004]);
    }

    #[test]
    fn trend_needs_a_selected_region() {
        let rows = sample();
        let window = YearRange::new(1896, 2016);
        assert!(region_medal_trend(&rows, &Filter::Any, window).is_empty());

        let unmapped = region_medal_trend(&rows, &Filter::Exactly(None), window);
        assert_eq!(unmapped.len(), 1);
        assert_eq!(unmapped[0].year, 2000);
        assert_eq!(unmapped[0].bronze, 1);
    }
}
