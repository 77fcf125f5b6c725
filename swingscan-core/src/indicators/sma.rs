//! Simple Moving Average (SMA) and the close-to-SMA trend ratio.
//!
//! sma[t]   = mean(close[t-period+1..=t])
//! trend[t] = close[t] / sma[t]   (> 1 means price above trend)
//! Lookback: period - 1 (first valid value at index period-1).

use super::{rolling_mean, Indicator};
use crate::domain::{closes, DailyBar};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[DailyBar]) -> Vec<f64> {
        rolling_mean(&closes(bars), self.period)
    }
}

/// close / SMA(period). Undefined where the average is zero or undefined.
#[derive(Debug, Clone)]
pub struct TrendRatio {
    sma: Sma,
    name: String,
}

impl TrendRatio {
    pub fn new(period: usize) -> Self {
        Self {
            sma: Sma::new(period),
            name: format!("trend_{period}"),
        }
    }
}

impl Indicator for TrendRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.sma.lookback()
    }

    fn compute(&self, bars: &[DailyBar]) -> Vec<f64> {
        self.sma
            .compute(bars)
            .iter()
            .zip(bars)
            .map(|(&avg, bar)| {
                if avg == 0.0 || avg.is_nan() {
                    f64::NAN
                } else {
                    bar.close / avg
                }
            })
            .collect()
    }
}
