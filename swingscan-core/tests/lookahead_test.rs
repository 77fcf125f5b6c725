//! Look-ahead contamination tests for every indicator and the feature engine.
//!
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs.

use chrono::NaiveDate;
use swingscan_core::domain::DailyBar;
use swingscan_core::features::FeatureEngine;
use swingscan_core::indicators::*;

/// N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<DailyBar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut price = 100.0;

    (0..n)
        .map(|i| {
            // deterministic pseudo-random walk (LCG)
            let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
            let change = ((seed % 200) as f64 - 100.0) * 0.05;
            price = (price + change).max(10.0);

            let open = price - 0.5;
            let close = price + 0.3;
            DailyBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 2.0,
                low: open.min(close) - 2.0,
                close,
                volume: 1000.0 + ((i * 37) % 500) as f64 * 10.0,
            }
        })
        .collect()
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[DailyBar], truncated_len: usize) {
    let truncated = &full_bars[..truncated_len];
    let full_result = indicator.compute(full_bars);
    let truncated_result = indicator.compute(truncated);

    assert_eq!(
        truncated_result.len(),
        truncated_len,
        "{}: truncated result length mismatch",
        indicator.name()
    );
    assert_eq!(
        full_result.len(),
        full_bars.len(),
        "{}: full result length mismatch",
        indicator.name()
    );

    for i in 0..truncated_len {
        let t = truncated_result[i];
        let f = full_result[i];

        if t.is_nan() && f.is_nan() {
            continue;
        }

        assert!(
            !t.is_nan() && !f.is_nan(),
            "{}: NaN mismatch at bar {i} (truncated={t}, full={f})",
            indicator.name()
        );

        assert!(
            (t - f).abs() < 1e-10,
            "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}",
            indicator.name()
        );
    }
}

/// The first defined value sits exactly at `lookback()`.
fn assert_lookback(indicator: &dyn Indicator, bars: &[DailyBar]) {
    let values = indicator.compute(bars);
    let lookback = indicator.lookback();
    assert!(
        values[..lookback].iter().all(|v| v.is_nan()),
        "{}: defined before lookback {lookback}",
        indicator.name()
    );
    assert!(
        values[lookback].is_finite(),
        "{}: undefined at lookback {lookback}",
        indicator.name()
    );
}

#[test]
fn lookahead_returns() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&DailyReturn, &bars, 100);
    assert_no_lookahead(&LaggedReturn::new(1), &bars, 100);
    assert_no_lookahead(&LaggedReturn::new(3), &bars, 100);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
    assert_no_lookahead(&Rsi::new(5), &bars, 100);
}

#[test]
fn lookahead_sma_and_trend() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Sma::new(20), &bars, 100);
    assert_no_lookahead(&TrendRatio::new(20), &bars, 100);
}

#[test]
fn lookahead_volatility() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&ReturnVolatility::new(5), &bars, 100);
    assert_no_lookahead(&ReturnVolatility::new(10), &bars, 100);
}

#[test]
fn lookahead_volume_velocity() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&VolumeVelocity::new(10), &bars, 100);
}

#[test]
fn lookbacks_match_first_defined_value() {
    let bars = make_test_bars(60);
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(DailyReturn),
        Box::new(LaggedReturn::new(1)),
        Box::new(Rsi::new(14)),
        Box::new(Sma::new(20)),
        Box::new(TrendRatio::new(20)),
        Box::new(ReturnVolatility::new(5)),
        Box::new(VolumeVelocity::new(10)),
    ];
    for indicator in &indicators {
        assert_lookback(indicator.as_ref(), &bars);
    }
}

#[test]
fn feature_rows_do_not_change_when_history_grows() {
    let bars = make_test_bars(200);
    let engine = FeatureEngine::default();
    let truncated = engine.build(&bars[..100]);
    let full = engine.build(&bars);

    assert!(!truncated.is_empty());
    assert_eq!(&full[..truncated.len()], &truncated[..]);
}
