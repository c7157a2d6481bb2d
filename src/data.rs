//! Loading the advertising-performance table

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::path::Path;

/// Date-only layouts, day-first before ISO so `05-01-24` is never read as year 5.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d/%m/%Y", "%d-%m-%y", "%d-%m-%Y", "%d.%m.%y", "%d.%m.%Y", "%Y-%m-%d",
    "%Y/%m/%d",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

/// One row of the performance export.
///
/// Every field is optional: an absent column and an empty cell both read as
/// `None`. Which columns were actually present is tracked by [`RecordTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdRecord {
    /// Reporting date, day-first (DD/MM/YYYY) or ISO (YYYY-MM-DD); unparseable values become empty
    #[serde(default, deserialize_with = "deserialize_day_first")]
    pub date: Option<NaiveDateTime>,
    /// Geography identifier used to group revenue
    #[serde(default)]
    pub geo_id: Option<String>,
    /// Impressions served
    #[serde(default)]
    pub total_impressions: Option<f64>,
    /// Revenue earned
    #[serde(default)]
    pub total_revenue: Option<f64>,
    /// Revenue share, in percent
    #[serde(default)]
    pub revenue_share_percent: Option<f64>,
    /// Impressions that met the viewability standard
    #[serde(default)]
    pub viewable_impressions: Option<f64>,
    /// Impressions where viewability could be measured
    #[serde(default)]
    pub measurable_impressions: Option<f64>,
}

/// The loaded table: rows in file order plus the header columns that were present.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    columns: Vec<String>,
    records: Vec<AdRecord>,
}

impl RecordTable {
    pub fn new(columns: Vec<String>, records: Vec<AdRecord>) -> Self {
        RecordTable { columns, records }
    }

    pub fn records(&self) -> &[AdRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// The first of `names` that is not a header column, if any
    pub fn first_missing<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        names.iter().copied().find(|name| !self.has_column(name))
    }

    /// Rows whose date cell was empty or could not be parsed
    pub fn missing_dates(&self) -> usize {
        self.records.iter().filter(|r| r.date.is_none()).count()
    }
}

/// Load the table at `path`
pub fn load(path: &Path) -> Result<RecordTable> {
    log::info!("Loading dataset from {}", path.display());
    let file = std::fs::File::open(path).map_err(|e| Error::DataLoad {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let table = read_csv(file).map_err(|source| Error::DataLoad {
        path: path.to_path_buf(),
        source,
    })?;

    if table.is_empty() {
        log::warn!("{} has a header but no data rows", path.display());
    } else {
        log::info!("Loaded {} rows", table.len());
    }
    let missing = table.missing_dates();
    if missing > 0 {
        log::warn!("{} rows have a missing or unparseable date", missing);
    }
    Ok(table)
}

/// Read a comma-delimited table with a header row
pub fn read_csv<R: Read>(reader: R) -> std::result::Result<RecordTable, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "no columns to parse from file",
        )));
    }
    let records: std::result::Result<Vec<AdRecord>, _> = rdr.deserialize::<AdRecord>().collect();
    Ok(RecordTable::new(columns, records?))
}

/// Parse a date cell using the day-first convention.
///
/// Returns `None` for anything unrecognised rather than failing.
pub fn parse_day_first(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (date_part, time_part) = match s.split_once(['T', ' ']) {
        Some((d, t)) => (d, Some(t.trim())),
        None => (s, None),
    };

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())?;

    let time = match time_part {
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
        Some(t) => TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(t, fmt).ok())?,
    };
    Some(date.and_time(time))
}

fn deserialize_day_first<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_day_first))
}
