/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  athlete_events.csv   noc_regions.csv
///          │                  │
///          ▼                  ▼
///   ┌──────────────────────────────┐
///   │  loader  left join on NOC,    │  → OlympicDataset (immutable)
///   │          drop duplicate rows  │
///   └──────────────────────────────┘
///                 │
///                 ▼
///   ┌──────────┐   ┌────────┐
///   │  filter   │──▶│ group  │  group rows by key, fold accumulators
///   └──────────┘   └────────┘
///                 │
///       ┌─────────┼──────────────┐
///       ▼         ▼              ▼
///    medals  participation    ranking     derived tables
/// ```

pub mod error;
pub mod filter;
pub mod group;
pub mod loader;
pub mod medals;
pub mod model;
pub mod participation;
pub mod ranking;
