//! Console report and file export.
//!
//! - **Table**: right-aligned `Ticker / AI_Confidence / RSI / Status` columns
//! - **CSV / JSON**: admitted recommendations for downstream tools
//! - **Features CSV**: one ticker's labeled feature table (debug aid)

use std::path::Path;

use anyhow::{Context, Result};
use swingscan_core::features::LabeledRow;

use crate::recommendation::Recommendation;

pub const NO_SIGNALS: &str = "Scan complete. No high-confidence signals today.";
pub const SIGNALS_HEADER: &str = "TOP AI OPPORTUNITIES FOUND:";

const TABLE_HEADERS: [&str; 4] = ["Ticker", "AI_Confidence", "RSI", "Status"];

/// `0.8421` → `84.2%`
pub fn format_confidence(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Right-aligned table, one row per recommendation, in the given order.
pub fn format_table(recommendations: &[Recommendation]) -> String {
    let rows: Vec<[String; 4]> = recommendations
        .iter()
        .map(|r| {
            [
                r.ticker.clone(),
                format_confidence(r.confidence),
                format!("{:.2}", r.rsi),
                r.status.to_string(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &TABLE_HEADERS, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize; 4]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:>w$}", cell.as_ref()))
        .collect();
    out.push_str(&line.join(" "));
    out.push('\n');
}

/// The full stdout report: the table, or the no-signal message.
pub fn format_report(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        format!("{NO_SIGNALS}\n")
    } else {
        format!("{SIGNALS_HEADER}\n{}", format_table(recommendations))
    }
}

// ─── Export ─────────────────────────────────────────────────────────

pub fn export_csv(recommendations: &[Recommendation]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["ticker", "confidence", "rsi", "status", "as_of"])?;
    for r in recommendations {
        wtr.write_record([
            r.ticker.clone(),
            format!("{:.6}", r.confidence),
            format!("{:.4}", r.rsi),
            r.status.to_string(),
            r.as_of.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn export_json(recommendations: &[Recommendation]) -> Result<String> {
    serde_json::to_string_pretty(recommendations)
        .context("failed to serialize recommendations to JSON")
}

pub fn write_csv(path: &Path, recommendations: &[Recommendation]) -> Result<()> {
    let csv = export_csv(recommendations)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

pub fn write_json(path: &Path, recommendations: &[Recommendation]) -> Result<()> {
    let json = export_json(recommendations)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Labeled feature table as CSV, one row per labeled bar.
pub fn export_features_csv(rows: &[LabeledRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "close",
        "rsi",
        "ma20",
        "trend_signal",
        "lag_1",
        "volatility_5d",
        "vol_velocity",
        "shamsi_month",
        "is_dividend_season",
        "next_day_target",
        "future_close",
        "swing_target",
    ])?;
    for row in rows {
        let f = &row.features;
        wtr.write_record([
            f.date.to_string(),
            format!("{:.4}", f.close),
            format!("{:.4}", f.rsi),
            format!("{:.4}", f.ma20),
            format!("{:.6}", f.trend_signal),
            format!("{:.6}", f.lag_1_return),
            format!("{:.6}", f.volatility_5d),
            format!("{:.6}", f.vol_velocity),
            f.shamsi_month.to_string(),
            u8::from(f.is_dividend_season).to_string(),
            u8::from(row.next_day_target).to_string(),
            format!("{:.4}", row.future_close),
            u8::from(row.swing_target).to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
