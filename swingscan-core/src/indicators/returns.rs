//! Daily return and lagged return.
//!
//! return[t] = close[t] / close[t-1] - 1
//! lag_n[t]  = return[t-n]

use super::{pct_change, shift, Indicator};
use crate::domain::{closes, DailyBar};

#[derive(Debug, Clone, Default)]
pub struct DailyReturn;

impl Indicator for DailyReturn {
    fn name(&self) -> &str {
        "return"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[DailyBar]) -> Vec<f64> {
        pct_change(&closes(bars))
    }
}

/// The daily return as it was known `lag` bars ago.
#[derive(Debug, Clone)]
pub struct LaggedReturn {
    lag: usize,
    name: String,
}

impl LaggedReturn {
    pub fn new(lag: usize) -> Self {
        assert!(lag >= 1, "return lag must be >= 1");
        Self {
            lag,
            name: format!("lag_{lag}"),
        }
    }
}

impl Indicator for LaggedReturn {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.lag + 1
    }

    fn compute(&self, bars: &[DailyBar]) -> Vec<f64> {
        shift(&pct_change(&closes(bars)), self.lag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn daily_return_values() {
        let bars = make_bars(&[100.0, 102.0, 96.9]);
        let r = DailyReturn.compute(&bars);
        assert!(r[0].is_nan());
        assert_approx(r[1], 0.02, DEFAULT_EPSILON);
        assert_approx(r[2], -0.05, 1e-9);
    }

    #[test]
    fn lag_1_is_previous_return() {
        let bars = make_bars(&[100.0, 110.0, 121.0, 133.1]);
        let lag = LaggedReturn::new(1).compute(&bars);
        assert!(lag[0].is_nan());
        assert!(lag[1].is_nan());
        assert_approx(lag[2], 0.10, 1e-9);
        assert_approx(lag[3], 0.10, 1e-9);
    }

    #[test]
    fn lookbacks() {
        assert_eq!(DailyReturn.lookback(), 1);
        assert_eq!(LaggedReturn::new(1).lookback(), 2);
    }
}
