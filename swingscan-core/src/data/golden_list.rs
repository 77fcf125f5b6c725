//! Golden list: the curated tickers a scan screens.
//!
//! Stored as a CSV exported from the research notebook. Tickers come from
//! the `ticker` column when there is one, otherwise from the first column.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::DataError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenList {
    tickers: Vec<String>,
}

impl GoldenList {
    /// Build from tickers in priority order. Blanks and repeats are dropped.
    pub fn from_tickers<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let tickers = tickers
            .into_iter()
            .filter_map(|t| {
                let t = t.as_ref().trim();
                (!t.is_empty() && seen.insert(t.to_string())).then(|| t.to_string())
            })
            .collect();
        Self { tickers }
    }

    /// Load the golden-list CSV at `path`.
    pub fn from_csv(path: &Path) -> Result<Self, DataError> {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DataError::GoldenListMissing {
                    path: absolute_path(path),
                })
            }
            Err(source) => {
                return Err(DataError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let list = Self::from_reader(file, path)?;
        debug!(path = %path.display(), tickers = list.len(), "loaded golden list");
        Ok(list)
    }

    /// Parse golden-list CSV content. `path` is only used in error messages.
    pub fn from_reader<R: io::Read>(reader: R, path: &Path) -> Result<Self, DataError> {
        let csv_err = |source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let column = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case("ticker"))
            .unwrap_or(0);

        let mut cells = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(csv_err)?;
            if let Some(cell) = record.get(column) {
                cells.push(cell.to_string());
            }
        }
        Ok(Self::from_tickers(cells))
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

/// Resolve `path` against the working directory without touching the
/// filesystem (the file may not exist).
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
