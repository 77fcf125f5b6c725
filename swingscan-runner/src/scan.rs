//! Per-ticker fit-and-score loop.
//!
//! For every golden-list ticker, independently:
//! 1. load the daily series (no file: skip)
//! 2. build features and labels (too short: skip)
//! 3. fit a fresh classifier on every labeled row but the last
//! 4. score the last labeled row and apply the admission filter
//!
//! A failure for one ticker never stops the scan. Nothing is shared between
//! tickers except read-only configuration.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use swingscan_core::data::{DataError, SeriesSource};
use swingscan_core::features::{build_labels, FeatureEngine, LabelConfig};
use swingscan_core::model::{ModelError, ModelFactory};

use crate::config::ScanConfig;
use crate::recommendation::{rank, Recommendation, SignalStatus};

/// Confidence and overbought guard deciding which scores are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionPolicy {
    /// Probability must be strictly above this.
    pub min_confidence: f64,
    /// RSI must be strictly below this.
    pub max_rsi: f64,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            min_confidence: 0.70,
            max_rsi: 70.0,
        }
    }
}

impl AdmissionPolicy {
    pub fn admits(&self, confidence: f64, rsi: f64) -> bool {
        confidence > self.min_confidence && rsi < self.max_rsi
    }
}

/// Why a ticker produced no score.
#[derive(Debug, Error)]
pub enum TickerError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("insufficient history: {bars} bars give {labeled} labeled rows")]
    InsufficientHistory { bars: usize, labeled: usize },

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("non-finite probability {0}")]
    NonFiniteProbability(f64),
}

/// The score of one ticker's latest labeled row.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerScore {
    pub recommendation: Recommendation,
    pub admitted: bool,
}

/// Counts of what happened to each requested ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub requested: usize,
    pub missing: usize,
    pub insufficient_history: usize,
    pub failed: usize,
    pub rejected: usize,
    pub admitted: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Admitted tickers, highest confidence first.
    pub recommendations: Vec<Recommendation>,
    pub summary: ScanSummary,
}

/// Everything needed to score a ticker: feature windows, labels, the model
/// to fit and the admission rule.
pub struct Scanner {
    engine: FeatureEngine,
    labels: LabelConfig,
    factory: Box<dyn ModelFactory>,
    admission: AdmissionPolicy,
    parallel: bool,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            engine: FeatureEngine::new(config.features.clone()),
            labels: config.labels.clone(),
            factory: Box::new(config.model.clone()),
            admission: config.admission.clone(),
            parallel: config.scan.parallel,
        }
    }

    /// Replace the classifier used for every ticker.
    pub fn with_model_factory(mut self, factory: Box<dyn ModelFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Fit on one ticker's history and score its latest labeled row.
    pub fn score_ticker(
        &self,
        source: &dyn SeriesSource,
        ticker: &str,
    ) -> Result<TickerScore, TickerError> {
        let bars = source.load(ticker)?;
        let rows = self.engine.build(&bars);
        let labeled = build_labels(&bars, rows, &self.labels);

        let Some((scored, history)) = labeled.split_last() else {
            return Err(TickerError::InsufficientHistory {
                bars: bars.len(),
                labeled: 0,
            });
        };
        if history.is_empty() {
            return Err(TickerError::InsufficientHistory {
                bars: bars.len(),
                labeled: labeled.len(),
            });
        }

        let x: Vec<Vec<f64>> = history.iter().map(|r| r.features.model_inputs()).collect();
        let y: Vec<f64> = history
            .iter()
            .map(|r| if r.swing_target { 1.0 } else { 0.0 })
            .collect();

        let mut model = self.factory.build();
        model.fit(&x, &y)?;
        let confidence = model.predict_proba(&scored.features.model_inputs())?;
        if !confidence.is_finite() {
            return Err(TickerError::NonFiniteProbability(confidence));
        }

        let rsi = scored.features.rsi;
        Ok(TickerScore {
            admitted: self.admission.admits(confidence, rsi),
            recommendation: Recommendation {
                ticker: ticker.to_string(),
                confidence,
                rsi,
                as_of: scored.features.date,
                status: SignalStatus::StrongBuy,
            },
        })
    }

    /// Score one ticker and keep it only if the admission filter passes.
    pub fn scan_ticker(
        &self,
        source: &dyn SeriesSource,
        ticker: &str,
    ) -> Result<Option<Recommendation>, TickerError> {
        let score = self.score_ticker(source, ticker)?;
        Ok(score.admitted.then_some(score.recommendation))
    }

    /// Scan `tickers` in order and rank the admitted ones.
    pub fn run<S>(&self, source: &dyn SeriesSource, tickers: &[S]) -> ScanReport
    where
        S: AsRef<str> + Sync,
    {
        let results: Vec<Result<TickerScore, TickerError>> = if self.parallel {
            tickers
                .par_iter()
                .map(|t| self.score_ticker(source, t.as_ref()))
                .collect()
        } else {
            tickers
                .iter()
                .map(|t| self.score_ticker(source, t.as_ref()))
                .collect()
        };

        let mut summary = ScanSummary {
            requested: tickers.len(),
            ..ScanSummary::default()
        };
        let mut recommendations = Vec::new();

        for (ticker, result) in tickers.iter().zip(results) {
            let ticker = ticker.as_ref();
            match result {
                Ok(score) if score.admitted => {
                    summary.admitted += 1;
                    recommendations.push(score.recommendation);
                }
                Ok(score) => {
                    summary.rejected += 1;
                    debug!(
                        ticker,
                        confidence = score.recommendation.confidence,
                        rsi = score.recommendation.rsi,
                        "below admission threshold"
                    );
                }
                Err(TickerError::Data(e)) if e.is_not_found() => {
                    summary.missing += 1;
                    debug!(ticker, "no price file; skipped");
                }
                Err(e @ TickerError::InsufficientHistory { .. }) => {
                    summary.insufficient_history += 1;
                    debug!(ticker, reason = %e, "skipped");
                }
                Err(e) => {
                    summary.failed += 1;
                    debug!(ticker, error = %e, "skipped");
                }
            }
        }

        rank(&mut recommendations);
        info!(
            requested = summary.requested,
            admitted = summary.admitted,
            rejected = summary.rejected,
            missing = summary.missing,
            insufficient_history = summary.insufficient_history,
            failed = summary.failed,
            "scan finished"
        );

        ScanReport {
            recommendations,
            summary,
        }
    }
}

/// Scan with the classifier and thresholds from `config`.
pub fn run_scan<S: AsRef<str> + Sync>(
    config: &ScanConfig,
    source: &dyn SeriesSource,
    tickers: &[S],
) -> ScanReport {
    Scanner::new(config).run(source, tickers)
}
