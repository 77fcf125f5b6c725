//! Return volatility known as of the previous bar.
//!
//! vol[t] = sample_std(return[t-window..=t-1])
//! The window is shifted one bar so the current bar's return never enters.
//! Lookback: window + 1 (one bar for the first return, one for the shift).

use super::{pct_change, rolling_std, shift, Indicator};
use crate::domain::{closes, DailyBar};

#[derive(Debug, Clone)]
pub struct ReturnVolatility {
    window: usize,
    name: String,
}

impl ReturnVolatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "volatility window must be >= 2");
        Self {
            window,
            name: format!("volatility_{window}d"),
        }
    }
}

impl Indicator for ReturnVolatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window + 1
    }

    fn compute(&self, bars: &[DailyBar]) -> Vec<f64> {
        let returns = pct_change(&closes(bars));
        shift(&rolling_std(&returns, self.window), 1)
    }
}
