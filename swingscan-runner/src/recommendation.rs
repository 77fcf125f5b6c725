//! Admitted scan results.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStatus {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalStatus::StrongBuy => f.write_str("STRONG BUY"),
        }
    }
}

/// One ticker that passed the admission filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    /// Positive-class probability of the scored row, in [0, 1].
    pub confidence: f64,
    /// RSI of the scored row.
    pub rsi: f64,
    /// Date of the scored row.
    pub as_of: NaiveDate,
    pub status: SignalStatus,
}

/// Descending confidence; equal confidences keep their input order.
pub fn rank(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(ticker: &str, confidence: f64) -> Recommendation {
        Recommendation {
            ticker: ticker.into(),
            confidence,
            rsi: 50.0,
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status: SignalStatus::StrongBuy,
        }
    }

    #[test]
    fn rank_is_descending_and_stable() {
        let mut recs = vec![
            rec("A", 0.75),
            rec("B", 0.91),
            rec("C", 0.75),
            rec("D", 0.80),
        ];
        rank(&mut recs);
        let order: Vec<&str> = recs.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn status_displays_and_serializes_as_label() {
        assert_eq!(SignalStatus::StrongBuy.to_string(), "STRONG BUY");
        let json = serde_json::to_string(&rec("FOLD", 0.8)).unwrap();
        assert!(json.contains(r#""status":"STRONG BUY""#), "{json}");
        assert!(json.contains(r#""as_of":"2024-06-01""#), "{json}");
    }
}
