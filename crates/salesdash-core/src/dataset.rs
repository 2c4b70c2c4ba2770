//! Sales report loading and cleaning
//!
//! The dataset is built once at startup from the sales report CSV export and
//! is read-only afterwards. Loading never fails the process: a missing or
//! unreadable file yields an empty dataset, and individual rows with an
//! unparseable date or amount are dropped.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::filter::{self, FilterSpec, FilteredView};
use crate::models::{Field, Record, UNKNOWN};

/// Default chrono format of the `Date` column (`MM-DD-YY`)
pub const DEFAULT_DATE_FORMAT: &str = "%m-%d-%y";

const DATE_COLUMN: &str = "Date";
const AMOUNT_COLUMN: &str = "Amount";

/// Immutable, ordered table of cleaned records
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from already-cleaned records
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load the sales report at `path`
    ///
    /// Returns an empty dataset when the file is missing or cannot be parsed.
    pub fn load(path: &Path, date_format: &str) -> Self {
        if !path.exists() {
            warn!(
                path = %path.display(),
                "Sales report not found, starting with an empty dataset"
            );
            return Self::default();
        }

        let result = File::open(path)
            .map_err(Error::from)
            .and_then(|file| read_records(file, date_format));

        match result {
            Ok((records, dropped)) => {
                info!(
                    path = %path.display(),
                    loaded = records.len(),
                    dropped,
                    "Loaded sales report"
                );
                Self::from_records(records)
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load sales report, starting with an empty dataset"
                );
                Self::default()
            }
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unrestricted view over every record
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(self.records.iter().collect())
    }

    /// Records matching `spec`, in dataset order
    pub fn filter(&self, spec: &FilterSpec) -> FilteredView<'_> {
        filter::apply(self, spec)
    }
}

/// Parse a sales report CSV into a dataset
pub fn load_csv<R: Read>(reader: R, date_format: &str) -> Result<Dataset> {
    let (records, dropped) = read_records(reader, date_format)?;
    debug!(loaded = records.len(), dropped, "Parsed sales report");
    Ok(Dataset::from_records(records))
}

/// Header positions of the columns the dashboard uses
struct ColumnIndex {
    date: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
    region_state: Option<usize>,
    region_city: Option<usize>,
    status: Option<usize>,
    order_id: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let index = Self {
            date: find(DATE_COLUMN),
            amount: find(AMOUNT_COLUMN),
            category: find(Field::Category.column()),
            region_state: find(Field::RegionState.column()),
            region_city: find(Field::RegionCity.column()),
            status: find(Field::Status.column()),
            order_id: find(Field::OrderId.column()),
        };

        for (column, position) in [
            (DATE_COLUMN, index.date),
            (AMOUNT_COLUMN, index.amount),
            (Field::Category.column(), index.category),
            (Field::RegionState.column(), index.region_state),
            (Field::RegionCity.column(), index.region_city),
            (Field::Status.column(), index.status),
            (Field::OrderId.column(), index.order_id),
        ] {
            if position.is_none() {
                warn!(column, "Column not found, using '{}' for every row", UNKNOWN);
            }
        }

        index
    }
}

/// Read and clean all rows, returning the kept records and the dropped count
fn read_records<R: Read>(reader: R, date_format: &str) -> Result<(Vec<Record>, usize)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers);

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                debug!(error = %e, "Skipping malformed row");
                dropped += 1;
                continue;
            }
        };

        match clean_row(&row, &columns, date_format) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    Ok((records, dropped))
}

/// Turn a raw row into a record, or `None` if the date or amount is invalid
fn clean_row(row: &StringRecord, columns: &ColumnIndex, date_format: &str) -> Option<Record> {
    let date = parse_date(cell(row, columns.date)?, date_format)?;
    let amount = parse_amount(cell(row, columns.amount)?)?;

    let text = |idx: Option<usize>| cell(row, idx).unwrap_or(UNKNOWN).to_string();
    let place = |idx: Option<usize>| cell(row, idx).map_or_else(|| UNKNOWN.to_string(), title_case);

    Some(Record::new(
        date,
        text(columns.category),
        place(columns.region_state),
        place(columns.region_city),
        text(columns.status),
        amount,
        text(columns.order_id),
    ))
}

/// Trimmed, non-empty cell value
fn cell(row: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, format).ok()
}

/// Non-negative, finite decimal amount
fn parse_amount(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// Title-case a place name: each alphabetic run starts upper-case, the rest is lower-case
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alphabetic = false;
    for c in s.chars() {
        if prev_alphabetic {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alphabetic = c.is_alphabetic();
    }
    out
}

/// Choices offered by the category, state, and status selectors
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Sorted, distinct categories
    pub categories: Vec<String>,
    /// Sorted, distinct ship-to states
    pub states: Vec<String>,
    /// Distinct statuses in order of first appearance
    pub statuses: Vec<String>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let sorted = |field: Field| {
            dataset
                .records()
                .iter()
                .map(|r| r.field(field))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        let mut seen = HashSet::new();
        let statuses = dataset
            .records()
            .iter()
            .map(|r| r.status.as_str())
            .filter(|s| seen.insert(*s))
            .map(str::to_string)
            .collect();

        Self {
            categories: sorted(Field::Category),
            states: sorted(Field::RegionState),
            statuses,
        }
    }
}
