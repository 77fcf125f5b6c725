//! SwingScan Runner: scan orchestration and reporting.
//!
//! This crate builds on `swingscan-core` to provide:
//! - TOML scan configuration with defaults and validation
//! - The per-ticker fit-and-score loop, sequential or on the rayon pool
//! - Recommendation ranking
//! - Console table and CSV/JSON export

pub mod config;
pub mod recommendation;
pub mod report;
pub mod scan;

pub use config::{ConfigError, PathsConfig, ScanConfig, ScanOptions};
pub use recommendation::{rank, Recommendation, SignalStatus};
pub use report::{format_report, format_table, NO_SIGNALS};
pub use scan::{
    run_scan, AdmissionPolicy, ScanReport, ScanSummary, Scanner, TickerError, TickerScore,
};
