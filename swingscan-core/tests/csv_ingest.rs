//! CSV directory ingest feeding the feature engine.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use swingscan_core::data::{CsvDirectory, DataError, GoldenList, SeriesSource};
use swingscan_core::features::{build_labels, FeatureEngine, LabelConfig};

/// A broker-style export: mixed-case headers, an extra column, datetime
/// stamps, rows out of order.
fn write_export(dir: &Path, name: &str, n: usize) {
    let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let mut rows: Vec<String> = (0..n)
        .map(|i| {
            let date = base + chrono::Duration::days(i as i64);
            let close = 1000.0 + (i as f64 * 0.7).sin() * 25.0 + i as f64 * 3.0;
            format!(
                "{} 00:00:00,{:.2},{:.2},{:.2},{:.2},\"{}\",FOLD",
                date,
                close - 4.0,
                close + 10.0,
                close - 10.0,
                close,
                format_thousands(250_000 + (i as u64 * 7919) % 90_000)
            )
        })
        .collect();
    rows.reverse();

    let mut content = String::from("Date,Open,High,Low,Close,Volume,Name\n");
    for row in rows {
        writeln!(content, "{row}").unwrap();
    }
    fs::write(dir.join(name), content).unwrap();
}

fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[test]
fn export_loads_sorted_and_builds_features() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "FOLD-1403.csv", 60);

    let source = CsvDirectory::new(dir.path());
    let bars = source.load("FOLD").unwrap();
    assert_eq!(bars.len(), 60);
    assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    assert!(bars.iter().all(|b| b.is_sane()));
    assert!(bars[0].volume >= 250_000.0);

    let rows = FeatureEngine::default().build(&bars);
    assert_eq!(rows.len(), 41);
    let labeled = build_labels(&bars, rows, &LabelConfig::default());
    assert_eq!(labeled.len(), 36);
    assert_eq!(labeled[0].features.date, bars[19].date);
}

#[test]
fn blank_close_drops_rows_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    let mut content = String::from("date,open,high,low,close,volume\n");
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for i in 0..40 {
        let date = base + chrono::Duration::days(i);
        let close = if i == 30 {
            String::new()
        } else {
            format!("{}", 50.0 + i as f64 * 0.25 + (i % 3) as f64)
        };
        writeln!(content, "{date},50,60,40,{close},1000").unwrap();
    }
    fs::write(dir.path().join("SHASTA.csv"), content).unwrap();

    let bars = CsvDirectory::new(dir.path()).load("SHASTA").unwrap();
    assert_eq!(bars.len(), 40);
    assert!(bars[30].is_void());

    let rows = FeatureEngine::default().build(&bars);
    assert!(rows.iter().all(|r| r.bar_index < 30));
    assert_eq!(rows.len(), 11);
}

#[test]
fn unknown_ticker_is_not_found_and_bad_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("BROKEN.csv"), "date,close\n2024-01-01,5\n").unwrap();
    let source = CsvDirectory::new(dir.path());

    assert!(source.load("KHODRO").unwrap_err().is_not_found());
    let err = source.load("BROKEN").unwrap_err();
    assert!(matches!(err, DataError::MissingColumn { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn golden_list_drives_lookup() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "FOLD.csv", 30);
    let golden_path = dir.path().join("golden.csv");
    fs::write(&golden_path, "ticker,score\nFOLD,0.9\nKHODRO,0.8\n").unwrap();

    let golden = GoldenList::from_csv(&golden_path).unwrap();
    let source = CsvDirectory::new(dir.path());
    let found: Vec<&str> = golden.iter().filter(|t| source.load(t).is_ok()).collect();
    assert_eq!(found, vec!["FOLD"]);
}
