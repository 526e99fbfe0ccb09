use serde::Serialize;

use super::filter::{RegionFilter, SportFilter, YearRange};
use super::group::{cardinality, dedup_medal_key, group_reduce, sort_desc_by, MedalCount};
use super::model::ParticipationRecord;

// ---------------------------------------------------------------------------
// Athlete selection
// ---------------------------------------------------------------------------

/// Rows matching the athlete filters, untouched, plus how many athletes they cover.
#[derive(Debug, Clone, Serialize)]
pub struct AthleteSelection<'a> {
    pub rows: Vec<&'a ParticipationRecord>,
    pub unique_athletes: usize,
}

pub fn filter_athletes<'a>(
    rows: &'a [ParticipationRecord],
    years: YearRange,
    region: &RegionFilter,
    sport: &SportFilter,
) -> AthleteSelection<'a> {
    let rows: Vec<&ParticipationRecord> = rows
        .iter()
        .filter(|r| {
            years.contains(r.year) && region.matches_record(r) && sport.matches_sport(&r.sport)
        })
        .collect();
    let unique_athletes = cardinality(rows.iter().copied(), |r| r.athlete_id);
    AthleteSelection {
        rows,
        unique_athletes,
    }
}

/// Rows of one sport for a height/weight scatter. Rows missing either
/// measurement are kept; plotting code skips them.
pub fn height_weight_by_sport_and_region<'a>(
    rows: &'a [ParticipationRecord],
    sport: &str,
    region: &RegionFilter,
) -> Vec<&'a ParticipationRecord> {
    rows.iter()
        .filter(|r| r.sport == sport && region.matches_record(r))
        .collect()
}

// ---------------------------------------------------------------------------
// Medal rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AthleteMedals {
    pub athlete_id: u64,
    pub name: String,
    pub sport: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
}

#[derive(Default)]
struct AthleteTally {
    name: String,
    count: MedalCount,
}

fn rank_athletes<'a>(
    rows: impl IntoIterator<Item = &'a ParticipationRecord>,
    limit: usize,
) -> Vec<AthleteMedals> {
    let groups = group_reduce(
        dedup_medal_key(rows),
        |r| (r.athlete_id, r.sport.clone()),
        |tally: &mut AthleteTally, r| {
            if tally.name.is_empty() {
                tally.name = r.name.clone();
            }
            tally.count.add(r.medal);
        },
    );
    let mut table: Vec<AthleteMedals> = groups
        .into_iter()
        .map(|((athlete_id, sport), tally)| AthleteMedals {
            athlete_id,
            name: tally.name,
            sport,
            gold: tally.count.gold,
            silver: tally.count.silver,
            bronze: tally.count.bronze,
            total: tally.count.total(),
        })
        .collect();
    sort_desc_by(&mut table, |row| row.total);
    table.truncate(limit);
    table
}

/// Most decorated (athlete, sport) pairs over all rows.
pub fn top_athletes_by_medals(rows: &[ParticipationRecord], limit: usize) -> Vec<AthleteMedals> {
    rank_athletes(rows, limit)
}

/// Most decorated athletes of one sport up to and including `year_to`.
pub fn top_athletes_by_sport_and_year(
    rows: &[ParticipationRecord],
    sport: &str,
    year_to: i32,
    limit: usize,
) -> Vec<AthleteMedals> {
    let years = YearRange::up_to(year_to);
    rank_athletes(
        rows.iter().filter(|r| r.sport == sport && years.contains(r.year)),
        limit,
    )
}
