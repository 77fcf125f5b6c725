//! Series source trait and structured error types.
//!
//! The `SeriesSource` trait abstracts over where a ticker's daily history
//! comes from (a directory of CSV exports, an in-memory map) so the scan loop
//! can be driven from files in production and from fixtures in tests.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DailyBar;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no price file for ticker '{ticker}'")]
    SeriesNotFound { ticker: String },

    #[error("golden list not found at: {}", path.display())]
    GoldenListMissing { path: PathBuf },

    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    /// True for the expected "ticker has no data" case, which callers skip
    /// without treating it as a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::SeriesNotFound { .. })
    }
}

/// Anything that can hand out the daily history of a ticker.
pub trait SeriesSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Load the date-ascending daily series for `ticker`.
    fn load(&self, ticker: &str) -> Result<Vec<DailyBar>, DataError>;
}

/// Ticker → bars map. Used by tests and benches, and for embedding the scan
/// in another program that already holds its data.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, Vec<DailyBar>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: impl Into<String>, bars: Vec<DailyBar>) {
        self.series.insert(ticker.into(), bars);
    }

    pub fn with_series(mut self, ticker: impl Into<String>, bars: Vec<DailyBar>) -> Self {
        self.insert(ticker, bars);
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl SeriesSource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn load(&self, ticker: &str) -> Result<Vec<DailyBar>, DataError> {
        self.series
            .get(ticker)
            .cloned()
            .ok_or_else(|| DataError::SeriesNotFound {
                ticker: ticker.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.5,
            volume: 500.0,
        }
    }

    #[test]
    fn in_memory_round_trip() {
        let source = InMemorySource::new().with_series("FOLD", vec![bar(1), bar(2)]);
        assert_eq!(source.len(), 1);
        assert_eq!(source.load("FOLD").unwrap().len(), 2);
    }

    #[test]
    fn unknown_ticker_is_not_found() {
        let source = InMemorySource::new();
        let err = source.load("KHODRO").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no price file for ticker 'KHODRO'");
    }

    #[test]
    fn golden_list_error_names_the_path() {
        let err = DataError::GoldenListMissing {
            path: PathBuf::from("/srv/scan/golden.csv"),
        };
        assert_eq!(err.to_string(), "golden list not found at: /srv/scan/golden.csv");
        assert!(!err.is_not_found());
    }
}
