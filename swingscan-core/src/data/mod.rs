//! Data sources: per-ticker CSV exports and the golden list

pub mod csv_dir;
pub mod golden_list;
pub mod provider;

pub use csv_dir::{read_bars, CsvDirectory};
pub use golden_list::{absolute_path, GoldenList};
pub use provider::{DataError, InMemorySource, SeriesSource};
