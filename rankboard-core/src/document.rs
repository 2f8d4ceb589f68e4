//! Wire format for ranking documents.
//!
//! Two shapes are accepted:
//! - **Multi-universe**: a `universes[]` array, each with its own records and
//!   optional SEPA / chart / analyst sections.
//! - **Legacy**: `records`, `buy_count`, `sell_count` and `universe_size` at
//!   the top level, no `universes` key.
//!
//! The document may also arrive wrapped as a script assignment
//! (`window.TOP50_DATA = {...};`), the form used for pages opened straight
//! from disk.

use serde::Deserialize;

use crate::model::{
    Action, AnalystRecord, Capabilities, ChartSeries, Dataset, SepaRecord, SignalRecord, Universe,
};
use crate::source::LoadError;

/// Universe id given to the single universe of a legacy document.
pub const LEGACY_UNIVERSE_ID: &str = "default";

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    as_of_date: String,
    #[serde(default)]
    fundamentals_as_of: Option<String>,
    #[serde(default)]
    signal: String,
    #[serde(default)]
    universes: Option<Vec<RawUniverse>>,

    // Legacy single-universe fields.
    #[serde(default)]
    records: Option<Vec<RawRecord>>,
    #[serde(default)]
    universe_size: Option<usize>,
    #[serde(default)]
    buy_count: Option<usize>,
    #[serde(default)]
    sell_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawUniverse {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    records: Vec<RawRecord>,
    #[serde(default)]
    universe_size: Option<usize>,
    #[serde(default)]
    buy_count: Option<usize>,
    #[serde(default)]
    sell_count: Option<usize>,
    #[serde(default)]
    sepa_count: Option<usize>,
    #[serde(default)]
    sepa_candidates: Option<Vec<SepaRecord>>,
    #[serde(default)]
    sepa_charts: Option<Vec<ChartSeries>>,
    #[serde(default)]
    analyst_panel: Option<Vec<AnalystRecord>>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    ticker: String,
    rank: u32,
    #[serde(default)]
    composite_score: Option<f64>,
    #[serde(default)]
    momentum_12_1: Option<f64>,
    #[serde(default)]
    signal_12_1: Option<f64>,
    action: Action,
}

impl From<RawRecord> for SignalRecord {
    fn from(raw: RawRecord) -> Self {
        let momentum_score = raw.momentum_12_1.or(raw.signal_12_1);
        Self {
            ticker: raw.ticker,
            rank: raw.rank,
            composite_score: raw.composite_score.or(momentum_score),
            momentum_score,
            action: raw.action,
        }
    }
}

/// Counts default to what the records say when the producer left them out.
fn build_universe(
    id: String,
    name: String,
    raw_records: Vec<RawRecord>,
    universe_size: Option<usize>,
    buy_count: Option<usize>,
    sell_count: Option<usize>,
) -> Universe {
    let records: Vec<SignalRecord> = raw_records.into_iter().map(SignalRecord::from).collect();
    let count = |action: Action| records.iter().filter(|r| r.action == action).count();
    Universe {
        universe_size: universe_size.unwrap_or(records.len()),
        buy_count: buy_count.unwrap_or_else(|| count(Action::Buy)),
        sell_count: sell_count.unwrap_or_else(|| count(Action::Sell)),
        id,
        name,
        records,
        sepa_count: None,
        sepa_candidates: None,
        sepa_charts: None,
        analyst_panel: None,
    }
}

impl From<RawUniverse> for Universe {
    fn from(raw: RawUniverse) -> Self {
        let name = raw.name.unwrap_or_else(|| raw.id.clone());
        let mut universe = build_universe(
            raw.id,
            name,
            raw.records,
            raw.universe_size,
            raw.buy_count,
            raw.sell_count,
        );
        universe.sepa_count = raw.sepa_count;
        universe.sepa_candidates = raw.sepa_candidates;
        universe.sepa_charts = raw.sepa_charts;
        universe.analyst_panel = raw.analyst_panel;
        universe
    }
}

/// BLAKE3 hex digest of a document, used to recognise unchanged re-fetches.
pub fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Strip a `name = {...};` script assignment down to its JSON object.
fn strip_script_wrapper(text: &str) -> &str {
    let trimmed = text.trim().trim_start_matches('\u{feff}');
    if trimmed.starts_with('{') {
        return trimmed;
    }
    let Some(brace) = trimmed.find('{') else {
        return trimmed;
    };
    if !trimmed[..brace].contains('=') {
        return trimmed;
    }
    let body = trimmed[brace..].trim_end();
    body.strip_suffix(';').unwrap_or(body).trim_end()
}

/// Parse document bytes into a `Dataset`.
///
/// This does not validate ranks or counts; see `Dataset::validate`.
pub fn parse_document(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|_| LoadError::Encoding)?;
    let raw: RawDocument = serde_json::from_str(strip_script_wrapper(text))?;

    let has_universes = raw.universes.is_some();
    let universes: Vec<Universe> = match (raw.universes, raw.records) {
        (Some(universes), _) => universes.into_iter().map(Universe::from).collect(),
        (None, Some(records)) => vec![build_universe(
            LEGACY_UNIVERSE_ID.to_string(),
            raw.signal.clone(),
            records,
            raw.universe_size,
            raw.buy_count,
            raw.sell_count,
        )],
        (None, None) => Vec::new(),
    };

    let capabilities = Capabilities::detect(has_universes, &universes);
    tracing::debug!(
        universes = universes.len(),
        ?capabilities,
        "parsed ranking document"
    );

    Ok(Dataset {
        as_of_date: raw.as_of_date,
        fundamentals_as_of: raw.fundamentals_as_of,
        signal_name: raw.signal,
        universes,
        capabilities,
        digest: digest(bytes),
    })
}
