//! Domain types for a loaded ranking dataset.
//!
//! Everything here is immutable once `document::parse_document` returns. Score
//! fallbacks for legacy payloads are already resolved, so renderers never
//! look at which field a number came from.

use serde::{Deserialize, Serialize};

/// Trade action assigned to a ranked ticker upstream.
///
/// `BUY` and `SELL` are matched case-insensitively; every other value
/// (`HOLD`, `NEUTRAL`, an empty string) is the neutral action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Buy, Action::Sell, Action::Hold];

    pub fn label(self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

impl From<String> for Action {
    fn from(raw: String) -> Self {
        Action::from(raw.as_str())
    }
}

impl From<&str> for Action {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" => Action::Buy,
            "SELL" => Action::Sell,
            _ => Action::Hold,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One ranked ticker within a universe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRecord {
    pub ticker: String,
    pub rank: u32,
    /// Composite score, falling back to momentum then to the legacy 12-1 signal.
    /// An explicit `null` counts as absent and takes the fallback too, so a
    /// producer cannot force the placeholder while a momentum value exists.
    pub composite_score: Option<f64>,
    /// 12-1 momentum, falling back to the legacy 12-1 signal.
    pub momentum_score: Option<f64>,
    pub action: Action,
}

/// A SEPA trend-template candidate. Missing moving averages mean the ticker
/// lacks enough price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SepaRecord {
    pub ticker: String,
    #[serde(default)]
    pub rs_score: Option<f64>,
    #[serde(default, rename = "ma_50")]
    pub ma50: Option<f64>,
    #[serde(default, rename = "ma_150")]
    pub ma150: Option<f64>,
    #[serde(default, rename = "ma_200")]
    pub ma200: Option<f64>,
}

/// Analyst consensus row for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystRecord {
    pub ticker: String,
    #[serde(default)]
    pub consensus: Option<String>,
    #[serde(default)]
    pub analyst_count: Option<u32>,
    #[serde(default)]
    pub target_consensus: Option<f64>,
    #[serde(default)]
    pub target_low: Option<f64>,
    #[serde(default)]
    pub target_high: Option<f64>,
}

/// Price history for one SEPA candidate. Every value array runs parallel to
/// `dates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub ticker: String,
    #[serde(default)]
    pub rs_score: Option<f64>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub ma50: Vec<Option<f64>>,
    #[serde(default)]
    pub ma150: Vec<Option<f64>>,
    #[serde(default)]
    pub ma200: Vec<Option<f64>>,
    #[serde(default)]
    pub rs_line: Option<Vec<Option<f64>>>,
}

impl ChartSeries {
    /// The relative-strength line, only when it carries at least one value.
    pub fn visible_rs_line(&self) -> Option<&[Option<f64>]> {
        self.rs_line
            .as_deref()
            .filter(|line| line.iter().any(|v| v.is_some()))
    }

    /// Named value arrays in drawing order (the RS line is not included).
    pub fn price_series(&self) -> [(&'static str, &[Option<f64>]); 4] {
        [
            ("Close", &self.close),
            ("MA 50", &self.ma50),
            ("MA 150", &self.ma150),
            ("MA 200", &self.ma200),
        ]
    }
}

/// A named subset of the ranked market (e.g. "S&P 500 top 50").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Universe {
    pub id: String,
    pub name: String,
    pub records: Vec<SignalRecord>,
    pub universe_size: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub sepa_count: Option<usize>,
    pub sepa_candidates: Option<Vec<SepaRecord>>,
    pub sepa_charts: Option<Vec<ChartSeries>>,
    pub analyst_panel: Option<Vec<AnalystRecord>>,
}

/// Which optional sections the loaded document carries. Detected once from
/// the document shape and never re-inspected per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// The document uses the `universes[]` shape (and therefore views).
    pub has_universes: bool,
    pub has_sepa: bool,
    pub has_charts: bool,
    pub has_analyst: bool,
}

impl Capabilities {
    pub fn detect(has_universes: bool, universes: &[Universe]) -> Self {
        Self {
            has_universes,
            has_sepa: universes.iter().any(|u| u.sepa_candidates.is_some()),
            has_charts: universes.iter().any(|u| u.sepa_charts.is_some()),
            has_analyst: universes.iter().any(|u| u.analyst_panel.is_some()),
        }
    }

    /// Multi-view dashboards switch between signals, SEPA and charts.
    pub fn multi_view(&self) -> bool {
        self.has_universes
    }
}

/// A fully loaded ranking document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub as_of_date: String,
    pub fundamentals_as_of: Option<String>,
    pub signal_name: String,
    pub universes: Vec<Universe>,
    pub capabilities: Capabilities,
    /// BLAKE3 hex digest of the source document bytes.
    pub digest: String,
}

impl Dataset {
    pub fn universe(&self, id: &str) -> Option<&Universe> {
        self.universes.iter().find(|u| u.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.universes.is_empty()
    }

    /// Short digest prefix for status lines.
    pub fn short_digest(&self) -> &str {
        &self.digest[..self.digest.len().min(12)]
    }
}
