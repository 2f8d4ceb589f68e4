//! Data sources and the load error taxonomy.
//!
//! A `DataSource` only knows how to produce document bytes. Parsing,
//! digesting and validation are shared by every source through
//! `DataSource::load`, so the embedded, file and HTTP paths cannot drift.
//!
//! Loads are all-or-nothing and never retried: a failure leaves the caller
//! with no dataset and one error to show.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::document::parse_document;
use crate::model::Dataset;
use crate::validate::DatasetIssue;

/// Well-known relative location of the ranking document.
pub const DEFAULT_DATA_PATH: &str = "data/top50_signals.json";

/// Errors from loading a ranking document.
///
/// These are displayed verbatim on the status line, in both CLI and TUI.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network failure fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("document is not valid UTF-8")]
    Encoding,

    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset failed validation with {} issue(s); first: {}", .0.len(), first_issue(.0))]
    Malformed(Vec<DatasetIssue>),
}

fn first_issue(issues: &[DatasetIssue]) -> String {
    issues
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".into())
}

/// What to do with validation issues after a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Log each issue and keep the dataset (the dashboard's historical behavior).
    #[default]
    Lenient,
    /// Fail the load with `LoadError::Malformed` on any issue.
    Strict,
}

impl ValidationPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ValidationPolicy::Strict
        } else {
            ValidationPolicy::Lenient
        }
    }
}

/// Trait for ranking-document sources (embedded bytes, local file, HTTP).
pub trait DataSource: Send {
    /// Human-readable description for status lines and logs.
    fn describe(&self) -> String;

    /// Produce the raw document bytes.
    fn fetch(&self) -> Result<Vec<u8>, LoadError>;

    /// Fetch, parse and validate the document.
    fn load(&self, policy: ValidationPolicy) -> Result<Dataset, LoadError> {
        let source = self.describe();
        tracing::info!(%source, "loading ranking document");

        let bytes = self.fetch()?;
        let dataset = parse_document(&bytes)?;

        let issues = dataset.validate();
        if !issues.is_empty() {
            match policy {
                ValidationPolicy::Strict => return Err(LoadError::Malformed(issues)),
                ValidationPolicy::Lenient => {
                    for issue in &issues {
                        tracing::warn!(%source, "{issue}");
                    }
                }
            }
        }

        tracing::info!(
            %source,
            bytes = bytes.len(),
            universes = dataset.universes.len(),
            digest = dataset.short_digest(),
            "ranking document loaded"
        );
        Ok(dataset)
    }
}

/// A document that is already resident in memory.
#[derive(Debug, Clone)]
pub struct EmbeddedSource {
    label: String,
    bytes: Vec<u8>,
}

impl EmbeddedSource {
    pub fn new(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            bytes: bytes.into(),
        }
    }
}

impl DataSource for EmbeddedSource {
    fn describe(&self) -> String {
        format!("embedded:{}", self.label)
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        Ok(self.bytes.clone())
    }
}

/// A document on the local filesystem (`.json` or a script-wrapped `.js`).
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        std::fs::read(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// A document fetched with a blocking HTTP GET.
///
/// Must not be called from the UI thread; the TUI runs it on its loader thread.
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rankboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoadError::Network {
                url: url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { url, client })
    }
}

impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let network = |e: reqwest::Error| LoadError::Network {
            url: self.url.clone(),
            reason: e.to_string(),
        };

        let resp = self.client.get(&self.url).send().map_err(network)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        let body = resp.bytes().map_err(network)?;
        Ok(body.to_vec())
    }
}

/// Where the document lives, as written in config or on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    File(PathBuf),
    Url(String),
}

impl SourceSpec {
    /// `http://` and `https://` locations are URLs; anything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceSpec::Url(location.to_string())
        } else {
            SourceSpec::File(PathBuf::from(location))
        }
    }

    /// Build the concrete source.
    pub fn open(&self, timeout: Duration) -> Result<Box<dyn DataSource>, LoadError> {
        match self {
            SourceSpec::File(path) => Ok(Box::new(FileSource::new(path.clone()))),
            SourceSpec::Url(url) => Ok(Box::new(HttpSource::new(url.clone(), timeout)?)),
        }
    }
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::File(PathBuf::from(DEFAULT_DATA_PATH))
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::File(path) => write!(f, "{}", path.display()),
            SourceSpec::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{"as_of_date":"2025-01-31","signal":"s","universes":[
        {"id":"u","name":"U","records":[
            {"ticker":"A","rank":1,"signal_12_1":0.1,"action":"BUY"},
            {"ticker":"B","rank":1,"signal_12_1":0.0,"action":"SELL"}
        ]}]}"#;

    #[test]
    fn spec_parse_distinguishes_urls() {
        assert_eq!(
            SourceSpec::parse("https://example.com/top50_signals.json"),
            SourceSpec::Url("https://example.com/top50_signals.json".into())
        );
        assert_eq!(
            SourceSpec::parse("data/top50_signals.json"),
            SourceSpec::File(PathBuf::from("data/top50_signals.json"))
        );
        assert_eq!(SourceSpec::default().to_string(), DEFAULT_DATA_PATH);
    }

    #[test]
    fn embedded_source_loads_leniently() {
        let src = EmbeddedSource::new("test", DOC);
        let ds = src.load(ValidationPolicy::Lenient).unwrap();
        assert_eq!(ds.universes[0].records.len(), 2);
    }

    #[test]
    fn strict_policy_rejects_duplicate_ranks() {
        let src = EmbeddedSource::new("test", DOC);
        match src.load(ValidationPolicy::Strict) {
            Err(LoadError::Malformed(issues)) => assert!(!issues.is_empty()),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let src = FileSource::new("/nonexistent/rankboard/top50_signals.json");
        let err = src.load(ValidationPolicy::Lenient).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("top50_signals.json"));
    }

    #[test]
    fn malformed_error_message_names_first_issue() {
        let src = EmbeddedSource::new("test", DOC);
        let err = src.load(ValidationPolicy::Strict).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("issue(s)"), "{msg}");
        assert!(msg.contains("rank"), "{msg}");
    }
}
