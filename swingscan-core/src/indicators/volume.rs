//! Volume velocity: yesterday's volume relative to its trailing average.
//!
//! ratio[t]    = volume[t] / mean(volume[t-window+1..=t])
//! velocity[t] = ratio[t-1]
//! A zero average makes the ratio undefined instead of infinite.

use super::{rolling_mean, shift, Indicator};
use crate::domain::{volumes, DailyBar};

#[derive(Debug, Clone)]
pub struct VolumeVelocity {
    window: usize,
    name: String,
}

impl VolumeVelocity {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "volume window must be >= 1");
        Self {
            window,
            name: format!("vol_velocity_{window}"),
        }
    }
}

impl Indicator for VolumeVelocity {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[DailyBar]) -> Vec<f64> {
        let volume = volumes(bars);
        let ratio: Vec<f64> = rolling_mean(&volume, self.window)
            .iter()
            .zip(&volume)
            .map(|(&avg, &v)| {
                if avg == 0.0 || avg.is_nan() {
                    f64::NAN
                } else {
                    v / avg
                }
            })
            .collect();
        shift(&ratio, 1)
    }
}
