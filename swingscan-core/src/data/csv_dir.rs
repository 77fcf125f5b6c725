//! Directory of per-ticker CSV exports.
//!
//! A ticker's file is any `<ticker>*.csv` in the directory, so exports named
//! `FOLD.csv`, `FOLD-1403.csv` or `FOLD_adjusted.CSV` are all picked up. When
//! several match, the lexicographically first one wins.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::provider::{DataError, SeriesSource};
use crate::domain::DailyBar;

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Reads daily series from `<root>/<ticker>*.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if !root.is_dir() {
            warn!(path = %root.display(), "data directory does not exist; every ticker will be skipped");
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate the file for `ticker`, if any.
    pub fn find_file(&self, ticker: &str) -> Result<Option<PathBuf>, DataError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(DataError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut matches: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DataError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if is_ticker_file(name, ticker) && path.is_file() {
                matches.push(path);
            }
        }

        matches.sort();
        if matches.len() > 1 {
            debug!(ticker, candidates = matches.len(), "several files match; using the first");
        }
        Ok(matches.into_iter().next())
    }
}

impl SeriesSource for CsvDirectory {
    fn name(&self) -> &str {
        "csv-directory"
    }

    fn load(&self, ticker: &str) -> Result<Vec<DailyBar>, DataError> {
        let path = self
            .find_file(ticker)?
            .ok_or_else(|| DataError::SeriesNotFound {
                ticker: ticker.to_string(),
            })?;
        read_bars(&path)
    }
}

fn is_ticker_file(file_name: &str, ticker: &str) -> bool {
    if ticker.is_empty() || !file_name.starts_with(ticker) {
        return false;
    }
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Read one ticker's CSV file into date-ascending bars.
pub fn read_bars(path: &Path) -> Result<Vec<DailyBar>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bars(file, path)
}

/// Parse CSV content. `path` is only used in error messages.
pub fn parse_bars<R: io::Read>(reader: R, path: &Path) -> Result<Vec<DailyBar>, DataError> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(normalize_header)
        .collect();

    let mut columns = [0usize; 6];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })?;
    }
    let [date_col, open_col, high_col, low_col, close_col, volume_col] = columns;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line());
        let parse_err = |message: String| DataError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };
        let cell = |idx: usize, name: &'static str| {
            record
                .get(idx)
                .ok_or_else(|| parse_err(format!("row has no '{name}' field")))
        };

        let raw_date = cell(date_col, "date")?;
        let date =
            parse_date(raw_date).ok_or_else(|| parse_err(format!("bad date '{raw_date}'")))?;
        let number = |idx: usize, name: &'static str| -> Result<f64, DataError> {
            let raw = cell(idx, name)?;
            parse_number(raw).ok_or_else(|| parse_err(format!("bad {name} '{raw}'")))
        };

        bars.push(DailyBar {
            date,
            open: number(open_col, "open")?,
            high: number(high_col, "high")?,
            low: number(low_col, "low")?,
            close: number(close_col, "close")?,
            volume: number(volume_col, "volume")?,
        });
    }

    let raw_rows = bars.len();
    let bars = sort_and_dedup(bars);
    let suspect = bars.iter().filter(|b| !b.is_void() && !b.is_sane()).count();
    debug!(
        path = %path.display(),
        rows = bars.len(),
        duplicates = raw_rows - bars.len(),
        suspect,
        "loaded series"
    );
    Ok(bars)
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_ascii_lowercase()
}

/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYYMMDD`, optionally followed by a
/// time part (`2024-01-02 00:00:00`, `2024-01-02T09:30`).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.split([' ', 'T']).next().unwrap_or(raw);
    if day.len() == 8 && day.bytes().all(|b| b.is_ascii_digit()) {
        let year = day[..4].parse().ok()?;
        let month = day[4..6].parse().ok()?;
        let dom = day[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, dom);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

/// Empty cells become NaN; thousands separators are ignored.
fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    if raw.contains(',') {
        return raw.replace(',', "").parse().ok();
    }
    raw.parse().ok()
}

/// Ascending by date; for repeated dates the later row in the file wins.
fn sort_and_dedup(mut bars: Vec<DailyBar>) -> Vec<DailyBar> {
    bars.sort_by_key(|b| b.date);
    let mut out: Vec<DailyBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}
