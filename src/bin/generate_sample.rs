use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

// NOC, region, notes. "SGP" athletes have no mapping, like the real table's SIN/SGP mismatch.
const REGIONS: [(&str, &str, &str); 10] = [
    ("USA", "USA", ""),
    ("GBR", "UK", ""),
    ("FRA", "France", ""),
    ("GER", "Germany", ""),
    ("JPN", "Japan", ""),
    ("KEN", "Kenya", ""),
    ("NOR", "Norway", ""),
    ("AUS", "Australia", ""),
    ("SIN", "Singapore", ""),
    ("ROT", "", "Refugee Olympic Team"),
];
const ATHLETE_NOCS: [&str; 10] = ["USA", "GBR", "FRA", "GER", "JPN", "KEN", "NOR", "AUS", "SGP", "ROT"];

const GAMES: [(i64, &str, &str); 10] = [
    (1992, "Summer", "Barcelona"),
    (1992, "Winter", "Albertville"),
    (1994, "Winter", "Lillehammer"),
    (1996, "Summer", "Atlanta"),
    (1998, "Winter", "Nagano"),
    (2000, "Summer", "Sydney"),
    (2002, "Winter", "Salt Lake City"),
    (2004, "Summer", "Athina"),
    (2006, "Winter", "Torino"),
    (2008, "Summer", "Beijing"),
];
const SUMMER_SPORTS: [&str; 6] = ["Swimming", "Athletics", "Rowing", "Fencing", "Judo", "Gymnastics"];
const WINTER_SPORTS: [&str; 3] = ["Biathlon", "Alpine Skiing", "Speed Skating"];
const FIRST_NAMES: [&str; 8] = ["Anna", "Lars", "Mei", "John", "Amina", "Pierre", "Kenji", "Sofia"];
const LAST_NAMES: [&str; 8] = ["Berg", "Smith", "Tanaka", "Dubois", "Otieno", "Muller", "Brown", "Lee"];

struct SampleRow {
    id: i64,
    name: String,
    sex: &'static str,
    age: Option<f64>,
    height: Option<f64>,
    weight: Option<f64>,
    noc: &'static str,
    year: i64,
    season: &'static str,
    city: &'static str,
    sport: &'static str,
    event: String,
    medal: Option<&'static str>,
}

impl SampleRow {
    fn games(&self) -> String {
        format!("{} {}", self.year, self.season)
    }
}

fn generate_rows(rng: &mut SimpleRng, athletes: i64) -> Vec<SampleRow> {
    let mut rows = Vec::new();
    for id in 1..=athletes {
        let sex = if rng.chance(0.5) { "M" } else { "F" };
        let gender = if sex == "M" { "Men's" } else { "Women's" };
        let name = format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES));
        let noc = *rng.pick(&ATHLETE_NOCS);
        let season = if rng.chance(0.7) { "Summer" } else { "Winter" };
        let sport = if season == "Summer" {
            *rng.pick(&SUMMER_SPORTS)
        } else {
            *rng.pick(&WINTER_SPORTS)
        };
        let base = if sex == "M" { 180.0 } else { 168.0 };
        let height = (!rng.chance(0.1)).then(|| rng.gauss(base, 8.0).round());
        let weight = (!rng.chance(0.12)).then(|| rng.gauss(base - 105.0, 9.0).round());
        let born = 1960 + (rng.next_u64() % 25) as i64;

        for &(year, games_season, city) in GAMES.iter().filter(|g| g.1 == season) {
            if !rng.chance(0.4) {
                continue;
            }
            for n in 0..1 + rng.next_u64() % 2 {
                let medal = match rng.next_u64() % 10 {
                    0 => Some("Gold"),
                    1 => Some("Silver"),
                    2 => Some("Bronze"),
                    _ => None,
                };
                let row = SampleRow {
                    id,
                    name: name.clone(),
                    sex,
                    age: (!rng.chance(0.05)).then_some((year - born) as f64),
                    height,
                    weight,
                    noc,
                    year,
                    season: games_season,
                    city,
                    sport,
                    event: format!("{sport} {gender} Event {}", n + 1),
                    medal,
                };
                // Occasional exact duplicate, as found in the raw data.
                if rng.chance(0.02) {
                    rows.push(SampleRow {
                        name: row.name.clone(),
                        event: row.event.clone(),
                        ..row
                    });
                }
                rows.push(row);
            }
        }
    }
    rows
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "NA".to_string())
}

fn write_regions_csv(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating region CSV")?;
    writer.write_record(["NOC", "region", "notes"])?;
    for (noc, region, notes) in REGIONS {
        writer.write_record([noc, region, notes])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_events_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating athlete CSV")?;
    writer.write_record([
        "ID", "Name", "Sex", "Age", "Height", "Weight", "Team", "NOC", "Games", "Year", "Season",
        "City", "Sport", "Event", "Medal",
    ])?;
    for r in rows {
        writer.write_record([
            r.id.to_string(),
            r.name.clone(),
            r.sex.to_string(),
            fmt_opt(r.age),
            fmt_opt(r.height),
            fmt_opt(r.weight),
            r.noc.to_string(),
            r.noc.to_string(),
            r.games(),
            r.year.to_string(),
            r.season.to_string(),
            r.city.to_string(),
            r.sport.to_string(),
            r.event.clone(),
            r.medal.unwrap_or("NA").to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_events_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let utf8 = |name: &str, nullable: bool| Field::new(name, DataType::Utf8, nullable);
    let schema = Arc::new(Schema::new(vec![
        Field::new("ID", DataType::Int64, false),
        utf8("Name", false),
        utf8("Sex", false),
        Field::new("Age", DataType::Float64, true),
        Field::new("Height", DataType::Float64, true),
        Field::new("Weight", DataType::Float64, true),
        utf8("Team", false),
        utf8("NOC", false),
        utf8("Games", false),
        Field::new("Year", DataType::Int64, false),
        utf8("Season", false),
        utf8("City", false),
        utf8("Sport", false),
        utf8("Event", false),
        utf8("Medal", true),
    ]));

    let strings = |f: &dyn Fn(&SampleRow) -> String| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let floats = |f: &dyn Fn(&SampleRow) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(rows.iter().map(|r| r.id).collect::<Vec<_>>())),
        strings(&|r| r.name.clone()),
        strings(&|r| r.sex.to_string()),
        floats(&|r| r.age),
        floats(&|r| r.height),
        floats(&|r| r.weight),
        strings(&|r| r.noc.to_string()),
        strings(&|r| r.noc.to_string()),
        strings(&|r| r.games()),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
        strings(&|r| r.season.to_string()),
        strings(&|r| r.city.to_string()),
        strings(&|r| r.sport.to_string()),
        strings(&|r| r.event.clone()),
        Arc::new(StringArray::from(rows.iter().map(|r| r.medal).collect::<Vec<_>>())),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write a small synthetic dataset: `athlete_events.csv`, `athlete_events.parquet`
/// and `noc_regions.csv` into the given directory (default `data/sample`).
fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng, 400);

    write_regions_csv(&out_dir.join("noc_regions.csv"))?;
    write_events_csv(&out_dir.join("athlete_events.csv"), &rows)?;
    write_events_parquet(&out_dir.join("athlete_events.parquet"), &rows)?;

    log::info!("Wrote {} participation rows to {}", rows.len(), out_dir.display());
    Ok(())
}
