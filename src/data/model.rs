use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Summer,
    Winter,
}

/// Placing in one event. A record without a medal carries `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

/// Error returned when a categorical cell holds an unknown label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for Sex {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

impl FromStr for Season {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Summer" => Ok(Season::Summer),
            "Winter" => Ok(Season::Winter),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

impl FromStr for Medal {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Gold" => Ok(Medal::Gold),
            "Silver" => Ok(Medal::Silver),
            "Bronze" => Ok(Medal::Bronze),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Summer => write!(f, "Summer"),
            Season::Winter => write!(f, "Winter"),
        }
    }
}

// ---------------------------------------------------------------------------
// ParticipationRecord – one row of the joined dataset
// ---------------------------------------------------------------------------

/// One (athlete, event, edition) participation.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipationRecord {
    pub athlete_id: u64,
    /// Not unique: distinct athletes may share a name.
    pub name: String,
    pub sex: Sex,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub team: String,
    pub noc_code: String,
    /// Region resolved through the NOC lookup, `None` when the code is unmapped.
    pub region: Option<String>,
    /// Edition label, e.g. "1992 Summer".
    pub games: String,
    pub year: i32,
    pub season: Season,
    pub city: String,
    pub sport: String,
    pub event: String,
    pub medal: Option<Medal>,
}

/// Key identifying one medal-eligible participation.
///
/// Team events list every teammate's row for the same medal, and the raw data
/// repeats some rows; tallies deduplicate on this key before summing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MedalKey<'a> {
    pub athlete_id: u64,
    pub year: i32,
    pub sport: &'a str,
    pub event: &'a str,
    pub noc_code: &'a str,
    pub season: Season,
}

impl ParticipationRecord {
    pub fn medal_key(&self) -> MedalKey<'_> {
        MedalKey {
            athlete_id: self.athlete_id,
            year: self.year,
            sport: &self.sport,
            event: &self.event,
            noc_code: &self.noc_code,
            season: self.season,
        }
    }
}

// -- Manual Eq/Hash so exact-duplicate rows can be dropped through a HashSet --

impl PartialEq for ParticipationRecord {
    fn eq(&self, other: &Self) -> bool {
        fn bits(v: Option<f64>) -> Option<u64> {
            v.map(f64::to_bits)
        }
        self.athlete_id == other.athlete_id
            && self.name == other.name
            && self.sex == other.sex
            && self.age == other.age
            && bits(self.height) == bits(other.height)
            && bits(self.weight) == bits(other.weight)
            && self.team == other.team
            && self.noc_code == other.noc_code
            && self.region == other.region
            && self.games == other.games
            && self.year == other.year
            && self.season == other.season
            && self.city == other.city
            && self.sport == other.sport
            && self.event == other.event
            && self.medal == other.medal
    }
}

impl Eq for ParticipationRecord {}

impl Hash for ParticipationRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.athlete_id.hash(state);
        self.name.hash(state);
        self.sex.hash(state);
        self.age.hash(state);
        self.height.map(f64::to_bits).hash(state);
        self.weight.map(f64::to_bits).hash(state);
        self.team.hash(state);
        self.noc_code.hash(state);
        self.region.hash(state);
        self.games.hash(state);
        self.year.hash(state);
        self.season.hash(state);
        self.city.hash(state);
        self.sport.hash(state);
        self.event.hash(state);
        self.medal.hash(state);
    }
}

// ---------------------------------------------------------------------------
// OlympicDataset – the clean, immutable table
// ---------------------------------------------------------------------------

/// The joined, deduplicated dataset with pre-computed selector domains.
#[derive(Debug, Clone)]
pub struct OlympicDataset {
    /// All participation rows, in source order.
    pub records: Vec<ParticipationRecord>,
    /// Every region value, including `None` for unmapped NOC codes.
    pub regions: BTreeSet<Option<String>>,
    pub sports: BTreeSet<String>,
    /// Smallest and largest year, `None` for an empty dataset.
    pub year_span: Option<(i32, i32)>,
}

impl OlympicDataset {
    /// Drop exact-duplicate rows (keeping the first) and build the column indices.
    pub fn from_records(records: Vec<ParticipationRecord>) -> Self {
        let total = records.len();
        let mut seen: HashSet<ParticipationRecord> = HashSet::with_capacity(total);
        let mut unique = Vec::with_capacity(total);
        for record in records {
            if !seen.contains(&record) {
                seen.insert(record.clone());
                unique.push(record);
            }
        }
        if unique.len() < total {
            log::info!("Dropped {} duplicate rows", total - unique.len());
        }

        let mut regions = BTreeSet::new();
        let mut sports = BTreeSet::new();
        let mut year_span: Option<(i32, i32)> = None;
        for r in &unique {
            regions.insert(r.region.clone());
            sports.insert(r.sport.clone());
            year_span = Some(match year_span {
                Some((lo, hi)) => (lo.min(r.year), hi.max(r.year)),
                None => (r.year, r.year),
            });
        }

        OlympicDataset {
            records: unique,
            regions,
            sports,
            year_span,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn from_records_drops_exact_duplicates_only() {
        let a = record(1, Some("USA"), 2000, "Swimming");
        let mut b = a.clone();
        b.event = "Swimming Men's Relay".to_string();
        let ds = OlympicDataset::from_records(vec![a.clone(), a.clone(), b]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0], a);
    }

    #[test]
    fn missing_weight_rows_compare_equal() {
        let mut a = record(1, Some("USA"), 2000, "Swimming");
        a.weight = None;
        let ds = OlympicDataset::from_records(vec![a.clone(), a]);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn indices_include_unmapped_region() {
        let ds = OlympicDataset::from_records(vec![
            record(1, Some("USA"), 1996, "Rowing"),
            record(2, None, 2004, "Judo"),
        ]);
        assert!(ds.regions.contains(&None));
        assert!(ds.regions.contains(&Some("USA".to_string())));
        assert_eq!(ds.year_span, Some((1996, 2004)));
        assert_eq!(ds.sports.len(), 2);
    }

    #[test]
    fn labels_parse() {
        assert_eq!("Gold".parse::<Medal>(), Ok(Medal::Gold));
        assert_eq!("Winter".parse::<Season>(), Ok(Season::Winter));
        assert_eq!("F".parse::<Sex>(), Ok(Sex::Female));
        assert!("Tin".parse::<Medal>().is_err());
    }
}
