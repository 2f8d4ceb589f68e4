//! Data source integration: files on disk, script-wrapped documents and HTTP.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use rankboard_core::{
    DataSource, FileSource, HttpSource, LoadError, SourceSpec, ValidationPolicy,
};

const DOC: &str = r#"{
    "as_of_date": "2025-01-31",
    "signal": "Composite momentum",
    "universes": [{"id": "sp500_top50", "name": "S&P 500 Top 50", "records": [
        {"ticker": "NVDA", "rank": 1, "composite_score": 1.2, "action": "BUY"},
        {"ticker": "INTC", "rank": 2, "composite_score": -0.8, "action": "SELL"}
    ]}]
}"#;

/// Serve exactly one canned HTTP response on an ephemeral port.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}/data/top50_signals.json")
}

#[test]
fn file_source_reads_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("top50_signals.json");
    std::fs::write(&path, DOC).unwrap();

    let ds = FileSource::new(&path).load(ValidationPolicy::Strict).unwrap();
    assert_eq!(ds.universes[0].records.len(), 2);
    assert_eq!(ds.digest, rankboard_core::digest(DOC.as_bytes()));
}

#[test]
fn file_source_reads_script_wrapped_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("top50_signals.js");
    std::fs::write(&path, format!("window.TOP50_DATA = {DOC};")).unwrap();

    let ds = FileSource::new(&path).load(ValidationPolicy::Lenient).unwrap();
    assert_eq!(ds.universes[0].id, "sp500_top50");
}

#[test]
fn truncated_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("top50_signals.json");
    std::fs::write(&path, &DOC[..DOC.len() / 2]).unwrap();

    let err = FileSource::new(&path)
        .load(ValidationPolicy::Lenient)
        .unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)), "{err}");
}

#[test]
fn spec_opens_file_sources() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    std::fs::write(&path, DOC).unwrap();

    let source = SourceSpec::parse(path.to_str().unwrap())
        .open(Duration::from_secs(1))
        .unwrap();
    assert!(source.describe().ends_with("doc.json"));
    assert!(source.load(ValidationPolicy::Lenient).is_ok());
}

#[test]
fn http_source_loads_document() {
    let url = serve_once("HTTP/1.1 200 OK", DOC);
    let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
    let ds = source.load(ValidationPolicy::Strict).unwrap();
    assert_eq!(ds.signal_name, "Composite momentum");
}

#[test]
fn http_non_success_status_is_error() {
    let url = serve_once("HTTP/1.1 404 Not Found", "{}");
    let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
    match source.load(ValidationPolicy::Lenient) {
        Err(LoadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}
