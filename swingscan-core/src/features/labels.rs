//! Training labels built from forward price movement.
//!
//! Labels look forward by construction, so they are only ever used as
//! training targets and never as model inputs.

use serde::{Deserialize, Serialize};

use super::FeatureRow;
use crate::domain::{closes, DailyBar};
use crate::indicators::pct_change;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Rows ahead used for the swing label.
    pub target_window: usize,
    /// Minimum forward gain (fraction) for a positive swing label.
    pub profit_threshold: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            target_window: 5,
            profit_threshold: 0.03,
        }
    }
}

/// A feature row together with its forward-looking labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    #[serde(flatten)]
    pub features: FeatureRow,
    /// The next raw bar closed with a positive return.
    pub next_day_target: bool,
    /// Close `target_window` rows ahead.
    pub future_close: f64,
    /// `future_close > close * (1 + profit_threshold)`.
    pub swing_target: bool,
}

/// Attach labels to a feature table.
///
/// `bars` is the raw series the rows were built from; it supplies the
/// next-day return. The last `target_window` rows have no forward close and
/// are dropped.
pub fn build_labels(
    bars: &[DailyBar],
    rows: Vec<FeatureRow>,
    config: &LabelConfig,
) -> Vec<LabeledRow> {
    let returns = pct_change(&closes(bars));
    let usable = rows.len().saturating_sub(config.target_window);
    let future: Vec<f64> = rows
        .iter()
        .skip(config.target_window)
        .map(|r| r.close)
        .collect();

    rows.into_iter()
        .take(usable)
        .zip(future)
        .map(|(features, future_close)| {
            let next_day_target = returns
                .get(features.bar_index + 1)
                .is_some_and(|&r| r > 0.0);
            let swing_target = future_close > features.close * (1.0 + config.profit_threshold);
            LabeledRow {
                features,
                next_day_target,
                future_close,
                swing_target,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureEngine;
    use crate::indicators::make_bars;

    fn rising(n: usize, step: f64) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 * (1.0 + step).powi(i as i32) + if i % 3 == 0 { -0.4 } else { 0.0 })
            .collect()
    }

    #[test]
    fn drops_final_window_rows() {
        let bars = make_bars(&rising(40, 0.01));
        let rows = FeatureEngine::default().build(&bars);
        let n = rows.len();
        let last_kept_index = rows[n - 6].bar_index;
        let labeled = build_labels(&bars, rows, &LabelConfig::default());
        assert_eq!(labeled.len(), n - 5);
        assert_eq!(labeled.last().unwrap().features.bar_index, last_kept_index);
    }

    #[test]
    fn swing_target_compares_future_close() {
        let bars = make_bars(&rising(40, 0.01));
        let rows = FeatureEngine::default().build(&bars);
        let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
        let labeled = build_labels(&bars, rows, &LabelConfig::default());
        for (k, row) in labeled.iter().enumerate() {
            assert_eq!(row.future_close, closes[k + 5]);
            assert_eq!(row.swing_target, closes[k + 5] > closes[k] * 1.03);
        }
        // ~5% drift over five bars clears 3% everywhere
        assert!(labeled.iter().all(|r| r.swing_target));
    }

    #[test]
    fn swing_threshold_is_strict() {
        let bars = make_bars(&rising(40, 0.0));
        let rows = FeatureEngine::default().build(&bars);
        let cfg = LabelConfig {
            target_window: 5,
            profit_threshold: 0.0,
        };
        let labeled = build_labels(&bars, rows, &cfg);
        // future == close on equal prices: never strictly greater
        for row in labeled
            .iter()
            .filter(|r| r.future_close == r.features.close)
        {
            assert!(!row.swing_target);
        }
    }

    #[test]
    fn next_day_target_uses_raw_next_bar() {
        let bars = make_bars(&rising(40, 0.01));
        let rows = FeatureEngine::default().build(&bars);
        let labeled = build_labels(&bars, rows, &LabelConfig::default());
        for row in &labeled {
            let i = row.features.bar_index;
            assert_eq!(row.next_day_target, bars[i + 1].close > bars[i].close);
        }
    }

    #[test]
    fn table_shorter_than_window_is_empty() {
        let bars = make_bars(&rising(24, 0.01));
        let rows = FeatureEngine::default().build(&bars);
        assert_eq!(rows.len(), 5);
        assert!(build_labels(&bars, rows, &LabelConfig::default()).is_empty());
    }

    #[test]
    fn labeled_row_count_is_bars_minus_warmup_and_horizon() {
        for n in [25, 26, 40] {
            let bars = make_bars(&rising(n, 0.01));
            let rows = FeatureEngine::default().build(&bars);
            let labeled = build_labels(&bars, rows, &LabelConfig::default());
            assert_eq!(labeled.len(), n - 24, "n = {n}");
        }
    }
}
