use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{DatasetError, Result};
use super::model::{OlympicDataset, ParticipationRecord};

/// Columns read from the athlete-events source, in the order rows are stored.
pub const ATHLETE_COLUMNS: [&str; 15] = [
    "ID", "Name", "Sex", "Age", "Height", "Weight", "Team", "NOC", "Games", "Year", "Season",
    "City", "Sport", "Event", "Medal",
];

/// Columns read from the region-lookup source. Its free-text `notes` column is ignored.
pub const REGION_COLUMNS: [&str; 2] = ["NOC", "region"];

const MISSING_MARKERS: [&str; 4] = ["", "NA", "NaN", "nan"];

/// Raw cells of the requested columns, with missing markers already mapped to `None`.
type Row = Vec<Option<String>>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load both sources, left-join on the NOC code and drop duplicate rows.
///
/// Either source may be CSV (`.csv`) or Parquet (`.parquet` / `.pq`).
pub fn load_dataset(athletes: &Path, regions: &Path) -> Result<OlympicDataset> {
    let lookup = load_region_lookup(regions)?;
    let rows = read_table(athletes, &ATHLETE_COLUMNS)?;
    let source_name = athletes.display().to_string();
    log::info!("Read {} rows from {source_name}", rows.len());

    let mut unmapped: BTreeSet<String> = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.into_iter().enumerate() {
        let mut record = parse_record(&source_name, row_no, row)?;
        match lookup.get(&record.noc_code) {
            Some(region) => record.region = region.clone(),
            None => {
                unmapped.insert(record.noc_code.clone());
            }
        }
        records.push(record);
    }
    if !unmapped.is_empty() {
        log::info!("NOC codes without a region mapping: {unmapped:?}");
    }

    let dataset = OlympicDataset::from_records(records);
    log::info!(
        "Dataset ready: {} rows, {} regions, {} sports",
        dataset.len(),
        dataset.regions.len(),
        dataset.sports.len()
    );
    Ok(dataset)
}

/// Read the NOC → region table. The first mapping wins when a code repeats.
pub fn load_region_lookup(path: &Path) -> Result<HashMap<String, Option<String>>> {
    let source_name = path.display().to_string();
    let mut lookup = HashMap::new();
    for (row_no, row) in read_table(path, &REGION_COLUMNS)?.into_iter().enumerate() {
        let mut cells = row.into_iter();
        let noc = required(&source_name, row_no, "NOC", cells.next().flatten())?;
        let region = cells.next().flatten();
        if lookup.contains_key(&noc) {
            log::warn!("{source_name}: duplicate mapping for NOC '{noc}' ignored");
            continue;
        }
        lookup.insert(noc, region);
    }
    Ok(lookup)
}

/// Read the requested columns of a table, dispatching by extension.
fn read_table(path: &Path, columns: &[&'static str]) -> Result<Vec<Row>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path, columns),
        "parquet" | "pq" => read_parquet(path, columns),
        other => Err(DatasetError::UnsupportedFormat(other.to_string())),
    }
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DatasetError::MissingSource {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if MISSING_MARKERS.contains(&cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path, columns: &[&'static str]) -> Result<Vec<Row>> {
    let mut reader = csv::Reader::from_reader(open_source(path)?);
    let headers = reader.headers()?.clone();

    let indices = columns
        .iter()
        .map(|&col| {
            headers
                .iter()
                .position(|h| h.trim() == col)
                .ok_or_else(|| DatasetError::SchemaMismatch {
                    source_name: path.display().to_string(),
                    column: col,
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            indices
                .iter()
                .map(|&i| record.get(i).and_then(normalize))
                .collect(),
        );
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by Pandas (`df.to_parquet()`) and Polars, where
/// integer columns holding missing values usually arrive as floats.
fn read_parquet(path: &Path, columns: &[&'static str]) -> Result<Vec<Row>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open_source(path)?)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let arrays = columns
            .iter()
            .map(|&col| {
                schema
                    .index_of(col)
                    .map(|i| batch.column(i).clone())
                    .map_err(|_| DatasetError::SchemaMismatch {
                        source_name: path.display().to_string(),
                        column: col,
                    })
            })
            .collect::<Result<Vec<ArrayRef>>>()?;

        for row in 0..batch.num_rows() {
            let cells = arrays
                .iter()
                .map(|col| cell_text(col, row))
                .collect::<Result<Row>>()?;
            rows.push(cells);
        }
    }
    Ok(rows)
}

/// Render a single Arrow cell as text so both sources share one row parser.
fn cell_text(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => {
            let v = col.as_primitive::<Float32Type>().value(row);
            if v.is_nan() {
                return Ok(None);
            }
            v.to_string()
        }
        DataType::Float64 => {
            let v = col.as_primitive::<Float64Type>().value(row);
            if v.is_nan() {
                return Ok(None);
            }
            v.to_string()
        }
        _ => array_value_to_string(col.as_ref(), row)?,
    };
    Ok(normalize(&text))
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

fn required(
    source_name: &str,
    row: usize,
    column: &'static str,
    cell: Option<String>,
) -> Result<String> {
    cell.ok_or_else(|| DatasetError::InvalidValue {
        source_name: source_name.to_string(),
        row,
        column,
        value: String::new(),
    })
}

/// Integers may arrive as "1992" or, from float-typed columns, as "1992.0".
fn parse_integer(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn parse_record(source_name: &str, row_no: usize, row: Row) -> Result<ParticipationRecord> {
    let invalid = |column: &'static str, value: &str| DatasetError::InvalidValue {
        source_name: source_name.to_string(),
        row: row_no,
        column,
        value: value.to_string(),
    };
    let mut cells = row.into_iter();
    let mut next = |column: &'static str| -> (&'static str, Option<String>) {
        (column, cells.next().flatten())
    };

    let (col, id) = next("ID");
    let id = required(source_name, row_no, col, id)?;
    let athlete_id = parse_integer(&id)
        .and_then(|v| u64::try_from(v).ok())
        .ok_or_else(|| invalid(col, &id))?;

    let (col, name) = next("Name");
    let name = required(source_name, row_no, col, name)?;

    let (col, sex) = next("Sex");
    let sex = required(source_name, row_no, col, sex)?;
    let sex = sex.parse().map_err(|_| invalid(col, &sex))?;

    let (col, age) = next("Age");
    let age = match age {
        Some(a) => Some(
            parse_integer(&a)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| invalid(col, &a))?,
        ),
        None => None,
    };

    let (col, height) = next("Height");
    let height = match height {
        Some(h) => Some(h.parse::<f64>().map_err(|_| invalid(col, &h))?),
        None => None,
    };

    let (col, weight) = next("Weight");
    let weight = match weight {
        Some(w) => Some(w.parse::<f64>().map_err(|_| invalid(col, &w))?),
        None => None,
    };

    let (col, team) = next("Team");
    let team = required(source_name, row_no, col, team)?;
    let (col, noc_code) = next("NOC");
    let noc_code = required(source_name, row_no, col, noc_code)?;
    let (col, games) = next("Games");
    let games = required(source_name, row_no, col, games)?;

    let (col, year) = next("Year");
    let year = required(source_name, row_no, col, year)?;
    let year = parse_integer(&year)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid(col, &year))?;

    let (col, season) = next("Season");
    let season = required(source_name, row_no, col, season)?;
    let season = season.parse().map_err(|_| invalid(col, &season))?;

    let (col, city) = next("City");
    let city = required(source_name, row_no, col, city)?;
    let (col, sport) = next("Sport");
    let sport = required(source_name, row_no, col, sport)?;
    let (col, event) = next("Event");
    let event = required(source_name, row_no, col, event)?;

    let (col, medal) = next("Medal");
    let medal = match medal {
        Some(m) => Some(m.parse().map_err(|_| invalid(col, &m))?),
        None => None,
    };

    Ok(ParticipationRecord {
        athlete_id,
        name,
        sex,
        age,
        height,
        weight,
        team,
        noc_code,
        region: None,
        games,
        year,
        season,
        city,
        sport,
        event,
        medal,
    })
}
