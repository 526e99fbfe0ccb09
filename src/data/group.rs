//! Group-by building blocks shared by every aggregation.
//!
//! Groups live in a `BTreeMap`, so results come out ordered by key with a
//! missing (`None`) key first. Requested sorts run afterwards with a stable
//! sort, leaving ties in key order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::Hash;

use serde::Serialize;

use super::model::{Medal, MedalKey, ParticipationRecord};

/// Fold every item into the accumulator of its key.
pub fn group_reduce<T, K, A>(
    items: impl IntoIterator<Item = T>,
    mut key: impl FnMut(&T) -> K,
    mut fold: impl FnMut(&mut A, T),
) -> BTreeMap<K, A>
where
    K: Ord,
    A: Default,
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for item in items {
        let k = key(&item);
        fold(groups.entry(k).or_default(), item);
    }
    groups
}

/// Number of items per key.
pub fn count_by<T, K: Ord>(
    items: impl IntoIterator<Item = T>,
    key: impl FnMut(&T) -> K,
) -> BTreeMap<K, usize> {
    group_reduce(items, key, |n: &mut usize, _| *n += 1)
}

/// Set of distinct values per key.
pub fn distinct_by<T, K: Ord, V: Ord>(
    items: impl IntoIterator<Item = T>,
    key: impl FnMut(&T) -> K,
    mut value: impl FnMut(&T) -> V,
) -> BTreeMap<K, BTreeSet<V>> {
    group_reduce(items, key, |set: &mut BTreeSet<V>, item| {
        set.insert(value(&item));
    })
}

/// Number of distinct values in a column.
pub fn cardinality<'a, V: Eq + Hash>(
    rows: impl IntoIterator<Item = &'a ParticipationRecord>,
    value: impl FnMut(&'a ParticipationRecord) -> V,
) -> usize {
    rows.into_iter().map(value).collect::<HashSet<V>>().len()
}

/// Keep the first row for every natural medal key.
///
/// Idempotent: applying it to its own output returns the same rows.
pub fn dedup_medal_key<'a>(
    rows: impl IntoIterator<Item = &'a ParticipationRecord>,
) -> Vec<&'a ParticipationRecord> {
    let mut seen: HashSet<MedalKey<'a>> = HashSet::new();
    let mut kept = Vec::new();
    for r in rows {
        if seen.insert(r.medal_key()) {
            kept.push(r);
        }
    }
    kept
}

// ---------------------------------------------------------------------------
// Medal one-hot accumulator
// ---------------------------------------------------------------------------

/// Gold/silver/bronze counters for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCount {
    pub fn add(&mut self, medal: Option<Medal>) {
        match medal {
            Some(Medal::Gold) => self.gold += 1,
            Some(Medal::Silver) => self.silver += 1,
            Some(Medal::Bronze) => self.bronze += 1,
            None => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }
}

/// Stable descending sort on a numeric column.
pub fn sort_desc_by<T, N: Ord>(rows: &mut [T], mut value: impl FnMut(&T) -> N) {
    rows.sort_by(|a, b| value(b).cmp(&value(a)));
}

/// Stable sort in the requested direction.
pub fn sort_directed<T>(rows: &mut [T], ascending: bool, mut cmp: impl FnMut(&T, &T) -> Ordering) {
    if ascending {
        rows.sort_by(|a, b| cmp(a, b));
    } else {
        rows.sort_by(|a, b| cmp(b, a));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{record, with_medal};

    #[test]
    fn group_reduce_orders_missing_key_first() {
        let rows = vec![
            record(1, Some("USA"), 2000, "Judo"),
            record(2, None, 2000, "Judo"),
            record(3, Some("FRA"), 2000, "Judo"),
            record(4, Some("USA"), 2004, "Judo"),
        ];
        let counts = count_by(&rows, |r| r.region.clone());
        let keys: Vec<_> = counts.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![None, Some("FRA".to_string()), Some("USA".to_string())]
        );
        assert_eq!(counts[&Some("USA".to_string())], 2);
    }

    #[test]
    fn distinct_by_collects_sets() {
        let rows = vec![
            record(1, Some("USA"), 2000, "Judo"),
            record(2, Some("USA"), 2000, "Judo"),
            record(3, Some("USA"), 2000, "Rowing"),
        ];
        let sets = distinct_by(&rows, |r| r.year, |r| r.sport.clone());
        assert_eq!(sets[&2000].len(), 2);
    }

    #[test]
    fn dedup_is_idempotent() {
        let a = with_medal(record(1, Some("USA"), 2000, "Swimming"), Medal::Gold);
        let mut teammate_row = a.clone();
        teammate_row.team = "United States-1".to_string();
        let b = record(2, Some("USA"), 2000, "Swimming");
        let rows = vec![a, teammate_row, b];

        let once = dedup_medal_key(&rows);
        let twice = dedup_medal_key(once.iter().copied());
        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn medal_count_totals() {
        let mut c = MedalCount::default();
        c.add(Some(Medal::Gold));
        c.add(Some(Medal::Bronze));
        c.add(None);
        assert_eq!(c.total(), 2);
        assert_eq!(c.silver, 0);
    }

    #[test]
    fn descending_sort_is_stable() {
        let mut rows = vec![("a", 1), ("b", 3), ("c", 1), ("d", 3)];
        sort_desc_by(&mut rows, |r| r.1);
        assert_eq!(rows, vec![("b", 3), ("d", 3), ("a", 1), ("c", 1)]);
    }
}
