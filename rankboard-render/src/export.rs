//! Export: the filtered table as CSV, the render model and chart configs as
//! JSON, and the on-disk site bundle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rankboard_core::{Dataset, RenderModel, SignalRecord};

use crate::chart::chart_specs;
use crate::html::{chart_payload, render_page, render_sepa_page};

fn csv_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => String::new(),
    }
}

/// Columns: ticker, rank, composite_score, momentum_score, action.
/// Missing scores are written as empty fields.
pub fn export_table_csv(records: &[SignalRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["ticker", "rank", "composite_score", "momentum_score", "action"])?;
    for r in records {
        let rank = r.rank.to_string();
        let composite = csv_number(r.composite_score);
        let momentum = csv_number(r.momentum_score);
        wtr.write_record([
            r.ticker.as_str(),
            rank.as_str(),
            composite.as_str(),
            momentum.as_str(),
            r.action.label(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn export_model_json(model: &RenderModel) -> Result<String> {
    serde_json::to_string_pretty(model).context("failed to serialize render model to JSON")
}

/// Chart.js configs for the active universe's charts (empty array when the
/// model has none).
pub fn export_charts_json(model: &RenderModel) -> Result<String> {
    let charts = model.board().map(|b| b.sepa_charts.as_slice()).unwrap_or(&[]);
    serde_json::to_string_pretty(&chart_payload(&chart_specs(charts)))
        .context("failed to serialize chart configs to JSON")
}

/// Write `index.html` and `charts.json` into `out_dir`, creating it if needed.
/// Returns the path of the page.
pub fn write_site(model: &RenderModel, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;

    let index = out_dir.join("index.html");
    std::fs::write(&index, render_page(model))
        .with_context(|| format!("failed to write {}", index.display()))?;

    let charts = out_dir.join("charts.json");
    std::fs::write(&charts, export_charts_json(model)?)
        .with_context(|| format!("failed to write {}", charts.display()))?;

    tracing::info!(dir = %out_dir.display(), "site written");
    Ok(index)
}

/// Write the pinned SEPA page for `universe_id` to `out`.
pub fn write_sepa_page(dataset: &Dataset, universe_id: &str, out: &Path) -> Result<()> {
    let html = render_sepa_page(dataset, universe_id)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output dir: {}", parent.display()))?;
    }
    std::fs::write(out, html).with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), universe = universe_id, "SEPA page written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankboard_core::Action;

    fn record(ticker: &str, rank: u32, score: Option<f64>, action: Action) -> SignalRecord {
        SignalRecord {
            ticker: ticker.into(),
            rank,
            composite_score: score,
            momentum_score: score,
            action,
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let csv = export_table_csv(&[
            record("AAPL", 1, Some(0.9), Action::Buy),
            record("MSFT", 2, None, Action::Hold),
        ])
        .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ticker,rank,composite_score,momentum_score,action");
        assert_eq!(lines[1], "AAPL,1,0.9000,0.9000,BUY");
        assert_eq!(lines[2], "MSFT,2,,,HOLD");
    }

    #[test]
    fn csv_of_nothing_is_header_only() {
        let csv = export_table_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn no_data_exports_empty_chart_list() {
        let model = RenderModel::NoData {
            signal_name: "s".into(),
            message: "m".into(),
        };
        assert_eq!(export_charts_json(&model).unwrap(), "[]");
        let json = export_model_json(&model).unwrap();
        assert!(json.contains("\"kind\": \"no_data\""));
    }
}
