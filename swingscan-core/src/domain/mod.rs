//! Domain types for SwingScan

pub mod bar;

pub use bar::{closes, volumes, DailyBar};
