use std::path::Path;
use std::process::{Command, Output};

const DOC: &str = r#"{
  "as_of_date": "2025-03-14",
  "signal": "Composite Momentum",
  "universes": [
    {"id": "sp500_top50", "name": "S&P 500 Top 50", "records": [
      {"ticker": "AAPL", "rank": 1, "composite_score": 0.9, "action": "BUY"},
      {"ticker": "MSFT", "rank": 2, "signal_12_1": 0.1234, "action": "SELL"},
      {"ticker": "GOOG", "rank": 3, "action": "BUY"}
    ]},
    {"id": "sp500_bottom100", "name": "S&P 500 Bottom 100", "records": [],
     "sepa_count": 1,
     "sepa_candidates": [{"ticker": "WBA", "rs_score": null, "ma_50": 12.5}],
     "sepa_charts": [
       {"ticker": "WBA", "rs_score": null, "dates": ["2025-03-13", "2025-03-14"],
        "close": [12.0, 12.4], "ma50": [null, 12.1], "ma150": [null, null], "ma200": [11.0, 11.0]}
     ]}
  ]
}"#;

const BROKEN_RANKS: &str = r#"{
  "as_of_date": "2025-03-14",
  "signal": "Composite",
  "universes": [
    {"id": "top", "records": [
      {"ticker": "AAPL", "rank": 1, "action": "BUY"},
      {"ticker": "MSFT", "rank": 1, "action": "SELL"}
    ]}
  ]
}"#;

fn write_doc(dir: &Path, content: &str) -> String {
    let path = dir.join("signals.json");
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

fn rankboard(dir: &Path, args: &[&str]) -> Output {
    // An explicit empty config keeps the user's own config file out of the test.
    let config = dir.join("config.toml");
    std::fs::write(&config, "").unwrap();
    Command::new(env!("CARGO_BIN_EXE_rankboard"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn summary_reports_first_universe() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_doc(dir.path(), DOC);
    let output = rankboard(dir.path(), &["--source", &source, "summary"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Composite Momentum"));
    assert!(text.contains("sp500_top50"));
    assert!(text.contains("Buys:           2"));
    assert!(text.contains("Sells:          1"));
}

#[test]
fn summary_json_for_selected_universe() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_doc(dir.path(), DOC);
    let output = rankboard(
        dir.path(),
        &["--source", &source, "summary", "--universe", "sp500_bottom100", "--json"],
    );
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["universe"], "sp500_bottom100");
    assert_eq!(value["counts"]["sepa_count"], 1);
    assert_eq!(value["capabilities"]["has_charts"], true);
}

#[test]
fn export_csv_applies_filter_and_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_doc(dir.path(), DOC);
    let output = rankboard(
        dir.path(),
        &["--source", &source, "export", "--query", "ms"],
    );
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("MSFT,2,0.1234,0.1234,SELL"));
}

#[test]
fn render_writes_site() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_doc(dir.path(), DOC);
    let out = dir.path().join("site");
    let output = rankboard(
        dir.path(),
        &[
            "--source",
            &source,
            "render",
            "--universe",
            "sp500_bottom100",
            "--view",
            "charts",
            "--out",
            out.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());
    let html = std::fs::read_to_string(out.join("index.html")).unwrap();
    assert!(html.contains("WBA"));
    assert!(html.contains("RS score: -"));
    assert!(out.join("charts.json").is_file());
}

#[test]
fn sepa_page_unknown_universe_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_doc(dir.path(), DOC);
    let out = dir.path().join("sepa.html");
    let output = rankboard(
        dir.path(),
        &[
            "--source",
            &source,
            "sepa-page",
            "--universe",
            "nasdaq",
            "--out",
            out.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("universe 'nasdaq' not found"));
    assert!(!out.exists());
}

#[test]
fn validate_flags_duplicate_rank() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_doc(dir.path(), BROKEN_RANKS);

    let output = rankboard(dir.path(), &["--source", &source, "validate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("rank 1 appears more than once"));

    // Lenient load still renders; strict refuses.
    let lenient = rankboard(dir.path(), &["--source", &source, "summary"]);
    assert!(lenient.status.success());
    let strict = rankboard(dir.path(), &["--source", &source, "--strict", "summary"]);
    assert!(!strict.status.success());
}

#[test]
fn validate_clean_document() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_doc(dir.path(), DOC);
    let output = rankboard(dir.path(), &["--source", &source, "validate"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("OK (2 universe(s))"));
}

#[test]
fn digest_is_stable_blake3_hex() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_doc(dir.path(), DOC);
    let first = stdout(&rankboard(dir.path(), &["--source", &source, "digest"]));
    let second = stdout(&rankboard(dir.path(), &["--source", &source, "digest"]));
    assert_eq!(first, second);
    let hex = first.split_whitespace().next().unwrap();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn missing_source_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let output = rankboard(
        dir.path(),
        &["--source", missing.to_str().unwrap(), "summary"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
}
