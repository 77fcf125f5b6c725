//! SwingScan Core: bars, indicators, features, labels, classifier and data sources.
//!
//! This crate contains everything needed to turn one ticker's daily history
//! into a scored prediction:
//! - Daily bar type and the solar Hijri calendar
//! - Trailing-window indicators behind a common `Indicator` trait
//! - Feature engine and forward-looking label builder
//! - Gradient-boosted tree classifier
//! - Series sources (CSV directory, in-memory) and the golden list

pub mod calendar;
pub mod data;
pub mod domain;
pub mod features;
pub mod indicators;
pub mod model;
