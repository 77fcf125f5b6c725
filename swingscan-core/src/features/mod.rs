//! Feature engine: turns one ticker's daily series into model-ready rows.
//!
//! Every indicator is computed over the whole series, then rows are kept only
//! where all of them are defined. Nothing is imputed: the warm-up head of the
//! series (20 bars with default windows) never produces a row.

pub mod labels;

pub use labels::{build_labels, LabelConfig, LabeledRow};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::shamsi_month;
use crate::domain::DailyBar;
use crate::indicators::{
    Indicator, LaggedReturn, ReturnVolatility, Rsi, Sma, TrendRatio, VolumeVelocity,
};

/// Names of the model inputs, in the order of [`FeatureRow::model_inputs`].
pub const MODEL_FEATURES: [&str; 4] = ["rsi", "vol_velocity", "sma_ratio", "volatility"];

/// Window lengths and calendar settings for the feature engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub rsi_period: usize,
    pub ma_period: usize,
    pub volatility_window: usize,
    pub volume_window: usize,
    /// Solar Hijri months flagged as dividend (general assembly) season.
    pub dividend_months: Vec<u32>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ma_period: 20,
            volatility_window: 5,
            volume_window: 10,
            dividend_months: vec![2, 3, 4],
        }
    }
}

/// One bar with all indicators defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Position of the source bar in the raw series.
    pub bar_index: usize,
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: f64,
    pub ma20: f64,
    pub trend_signal: f64,
    pub lag_1_return: f64,
    pub volatility_5d: f64,
    pub vol_velocity: f64,
    pub shamsi_month: u32,
    pub is_dividend_season: bool,
}

impl FeatureRow {
    /// Model inputs in [`MODEL_FEATURES`] order.
    pub fn model_inputs(&self) -> Vec<f64> {
        vec![
            self.rsi,
            self.vol_velocity,
            self.trend_signal,
            self.volatility_5d,
        ]
    }
}

/// Computes the indicator columns and drops rows with any undefined value.
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    config: FeatureConfig,
    rsi: Rsi,
    ma: Sma,
    trend: TrendRatio,
    lag: LaggedReturn,
    volatility: ReturnVolatility,
    volume: VolumeVelocity,
}

impl FeatureEngine {
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            rsi: Rsi::new(config.rsi_period),
            ma: Sma::new(config.ma_period),
            trend: TrendRatio::new(config.ma_period),
            lag: LaggedReturn::new(1),
            volatility: ReturnVolatility::new(config.volatility_window),
            volume: VolumeVelocity::new(config.volume_window),
            config,
        }
    }

    /// Bars consumed before the first row can be produced.
    pub fn warmup(&self) -> usize {
        [
            self.rsi.lookback(),
            self.ma.lookback(),
            self.lag.lookback(),
            self.volatility.lookback(),
            self.volume.lookback(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Build the feature table for a date-ascending series.
    pub fn build(&self, bars: &[DailyBar]) -> Vec<FeatureRow> {
        let rsi = self.rsi.compute(bars);
        let ma = self.ma.compute(bars);
        let trend = self.trend.compute(bars);
        let lag = self.lag.compute(bars);
        let volatility = self.volatility.compute(bars);
        let volume = self.volume.compute(bars);

        bars.iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                if bar.is_void() {
                    return None;
                }
                let values = [rsi[i], ma[i], trend[i], lag[i], volatility[i], volume[i]];
                if values.iter().any(|v| !v.is_finite()) {
                    return None;
                }
                let month = shamsi_month(bar.date);
                Some(FeatureRow {
                    bar_index: i,
                    date: bar.date,
                    close: bar.close,
                    rsi: rsi[i],
                    ma20: ma[i],
                    trend_signal: trend[i],
                    lag_1_return: lag[i],
                    volatility_5d: volatility[i],
                    vol_velocity: volume[i],
                    shamsi_month: month,
                    is_dividend_season: self.config.dividend_months.contains(&month),
                })
            })
            .collect()
    }
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}
