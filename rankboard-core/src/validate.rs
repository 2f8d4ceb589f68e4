//! Dataset validation.
//!
//! The producer is trusted to emit unique tickers, contiguous ranks and
//! parallel chart arrays, but nothing upstream enforces it. `validate`
//! reports every violation; the load policy decides whether they are fatal.

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Dataset, Universe};

/// A single structural problem found in a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetIssue {
    #[error("duplicate universe id '{id}'")]
    DuplicateUniverse { id: String },

    #[error("universe '{universe}': duplicate ticker {ticker}")]
    DuplicateTicker { universe: String, ticker: String },

    #[error("universe '{universe}': rank {rank} appears more than once")]
    DuplicateRank { universe: String, rank: u32 },

    #[error("universe '{universe}': {ticker} has rank {rank}, outside 1..={max}")]
    RankOutOfRange {
        universe: String,
        ticker: String,
        rank: u32,
        max: usize,
    },

    #[error(
        "universe '{universe}': buy_count {buys} + sell_count {sells} exceeds universe_size {size}"
    )]
    CountsExceedSize {
        universe: String,
        buys: usize,
        sells: usize,
        size: usize,
    },

    #[error("universe '{universe}': chart {ticker} '{series}' has {len} points, expected {expected}")]
    ChartLengthMismatch {
        universe: String,
        ticker: String,
        series: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("{field} '{value}' is not a YYYY-MM-DD date")]
    BadDate { field: &'static str, value: String },
}

fn check_date(field: &'static str, value: &str, issues: &mut Vec<DatasetIssue>) {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        issues.push(DatasetIssue::BadDate {
            field,
            value: value.to_string(),
        });
    }
}

fn check_universe(u: &Universe, issues: &mut Vec<DatasetIssue>) {
    let max = u.records.len();
    let mut tickers = HashSet::new();
    let mut ranks = HashSet::new();

    for rec in &u.records {
        if !tickers.insert(rec.ticker.as_str()) {
            issues.push(DatasetIssue::DuplicateTicker {
                universe: u.id.clone(),
                ticker: rec.ticker.clone(),
            });
        }
        if rec.rank == 0 || rec.rank as usize > max {
            issues.push(DatasetIssue::RankOutOfRange {
                universe: u.id.clone(),
                ticker: rec.ticker.clone(),
                rank: rec.rank,
                max,
            });
        } else if !ranks.insert(rec.rank) {
            issues.push(DatasetIssue::DuplicateRank {
                universe: u.id.clone(),
                rank: rec.rank,
            });
        }
    }

    if u.buy_count + u.sell_count > u.universe_size {
        issues.push(DatasetIssue::CountsExceedSize {
            universe: u.id.clone(),
            buys: u.buy_count,
            sells: u.sell_count,
            size: u.universe_size,
        });
    }

    for chart in u.sepa_charts.iter().flatten() {
        let expected = chart.dates.len();
        let rs_line = chart.rs_line.as_deref().map(|line| ("RS Line", line));
        for (series, values) in chart.price_series().into_iter().chain(rs_line) {
            if values.len() != expected {
                issues.push(DatasetIssue::ChartLengthMismatch {
                    universe: u.id.clone(),
                    ticker: chart.ticker.clone(),
                    series,
                    len: values.len(),
                    expected,
                });
            }
        }
    }
}

impl Dataset {
    /// Report every structural problem. An empty list means the dataset
    /// satisfies all invariants the renderers assume.
    pub fn validate(&self) -> Vec<DatasetIssue> {
        let mut issues = Vec::new();

        check_date("as_of_date", &self.as_of_date, &mut issues);
        if let Some(fundamentals) = &self.fundamentals_as_of {
            check_date("fundamentals_as_of", fundamentals, &mut issues);
        }

        let mut ids = HashSet::new();
        for universe in &self.universes {
            if !ids.insert(universe.id.as_str()) {
                issues.push(DatasetIssue::DuplicateUniverse {
                    id: universe.id.clone(),
                });
            }
            check_universe(universe, &mut issues);
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use crate::document::parse_document;

    use super::*;

    fn parse(doc: &str) -> Dataset {
        parse_document(doc.as_bytes()).unwrap()
    }

    #[test]
    fn clean_dataset_has_no_issues() {
        let ds = parse(
            r#"{"as_of_date":"2025-01-31","universes":[{"id":"u","records":[
                {"ticker":"A","rank":2,"signal_12_1":0.1,"action":"SELL"},
                {"ticker":"B","rank":1,"signal_12_1":0.2,"action":"BUY"}
            ]}]}"#,
        );
        assert!(ds.validate().is_empty());
    }

    #[test]
    fn rank_gap_and_duplicate_ticker() {
        let ds = parse(
            r#"{"as_of_date":"2025-01-31","universes":[{"id":"u","records":[
                {"ticker":"A","rank":1,"signal_12_1":0.1,"action":"BUY"},
                {"ticker":"A","rank":3,"signal_12_1":0.2,"action":"HOLD"}
            ]}]}"#,
        );
        let issues = ds.validate();
        assert!(issues.contains(&DatasetIssue::DuplicateTicker {
            universe: "u".into(),
            ticker: "A".into()
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, DatasetIssue::RankOutOfRange { rank: 3, max: 2, .. })));
    }

    #[test]
    fn counts_exceeding_size_are_flagged() {
        let ds = parse(
            r#"{"as_of_date":"2025-01-31","universes":[{"id":"u","records":[],
                "universe_size":1,"buy_count":1,"sell_count":1}]}"#,
        );
        assert!(matches!(
            ds.validate().as_slice(),
            [DatasetIssue::CountsExceedSize { size: 1, .. }]
        ));
    }

    #[test]
    fn chart_arrays_must_match_dates() {
        let ds = parse(
            r#"{"as_of_date":"2025-01-31","universes":[{"id":"u","records":[],
                "sepa_charts":[{"ticker":"NVDA","rs_score":null,
                    "dates":["2025-01-30","2025-01-31"],
                    "close":[1.0,2.0],"ma50":[null,null],"ma150":[null],"ma200":[null,null],
                    "rs_line":[0.5]}]}]}"#,
        );
        let issues = ds.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| matches!(
            i,
            DatasetIssue::ChartLengthMismatch { expected: 2, len: 1, .. }
        )));
    }

    #[test]
    fn bad_dates_and_duplicate_universes() {
        let ds = parse(
            r#"{"as_of_date":"31/01/2025","fundamentals_as_of":"2025-01-30",
                "universes":[{"id":"u","records":[]},{"id":"u","records":[]}]}"#,
        );
        let issues = ds.validate();
        assert!(issues.contains(&DatasetIssue::BadDate {
            field: "as_of_date",
            value: "31/01/2025".into()
        }));
        assert!(issues.contains(&DatasetIssue::DuplicateUniverse { id: "u".into() }));
        assert_eq!(issues.len(), 2);
    }
}
