use serde::Serialize;

use super::model::{ParticipationRecord, Season};

// ---------------------------------------------------------------------------
// Filter predicate: either pass everything or match one exact value
// ---------------------------------------------------------------------------

/// A selector value: `Any` is the "All" choice and applies no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Filter<T> {
    Any,
    Exactly(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::Any
    }
}

impl<T: PartialEq> Filter<T> {
    /// Whether `value` passes this filter.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::Any => true,
            Filter::Exactly(wanted) => wanted == value,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Filter::Any)
    }
}

/// Region selections address the unmapped bucket as `Exactly(None)`.
pub type RegionFilter = Filter<Option<String>>;

impl RegionFilter {
    /// Select one named region.
    pub fn region(name: &str) -> Self {
        Filter::Exactly(Some(name.to_string()))
    }

    pub fn matches_record(&self, record: &ParticipationRecord) -> bool {
        match self {
            Filter::Any => true,
            Filter::Exactly(wanted) => wanted.as_deref() == record.region.as_deref(),
        }
    }
}

pub type SeasonFilter = Filter<Season>;

pub type SportFilter = Filter<String>;

impl SportFilter {
    pub fn sport(name: &str) -> Self {
        Filter::Exactly(name.to_string())
    }

    pub fn matches_sport(&self, sport: &str) -> bool {
        match self {
            Filter::Any => true,
            Filter::Exactly(wanted) => wanted == sport,
        }
    }
}

// ---------------------------------------------------------------------------
// Year window
// ---------------------------------------------------------------------------

/// Inclusive year window. A window with `from > to` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    pub fn new(from: i32, to: i32) -> Self {
        YearRange { from, to }
    }

    /// Window with no lower bound.
    pub fn up_to(to: i32) -> Self {
        YearRange { from: i32::MIN, to }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.from <= year && year <= self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }
}

/// Rows inside `years`, with `season` applied.
pub fn select_window<'a>(
    rows: impl IntoIterator<Item = &'a ParticipationRecord>,
    years: YearRange,
    season: &SeasonFilter,
) -> Vec<&'a ParticipationRecord> {
    rows.into_iter()
        .filter(|r| years.contains(r.year) && season.matches(&r.season))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    #[test]
    fn any_passes_everything() {
        let f: Filter<i32> = Filter::Any;
        assert!(f.matches(&3));
        assert!(Filter::Exactly(3).matches(&3));
        assert!(!Filter::Exactly(4).matches(&3));
    }

    #[test]
    fn region_filter_can_select_unmapped_bucket() {
        let unmapped = record(1, None, 2000, "Judo");
        let usa = record(2, Some("USA"), 2000, "Judo");
        let f: RegionFilter = Filter::Exactly(None);
        assert!(f.matches_record(&unmapped));
        assert!(!f.matches_record(&usa));
        assert!(RegionFilter::region("USA").matches_record(&usa));
    }

    #[test]
    fn inverted_range_is_empty() {
        let r = YearRange::new(2010, 2000);
        assert!(r.is_empty());
        assert!(!r.contains(2005));
        assert!(YearRange::up_to(1900).contains(1896));
    }

    #[test]
    fn window_applies_season() {
        let mut winter = record(1, Some("NOR"), 1994, "Biathlon");
        winter.season = Season::Winter;
        let summer = record(2, Some("NOR"), 1996, "Rowing");
        let rows = vec![winter, summer];
        let picked = select_window(&rows, YearRange::new(1990, 2000), &Filter::Exactly(Season::Winter));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].athlete_id, 1);
    }
}
