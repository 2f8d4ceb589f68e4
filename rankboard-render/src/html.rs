//! Static HTML rendering of a `RenderModel`.
//!
//! Pages are self-contained: an inline stylesheet, the tables already filled
//! in, and (when the chart view is active) a small script that feeds the
//! precomputed Chart.js configs to the library loaded from a CDN.

use anyhow::{anyhow, Result};
use rankboard_core::{
    format, AnalystRecord, Board, Dataset, RenderModel, SepaRecord, SignalRecord,
};
use serde_json::{json, Value};

use crate::chart::{chart_specs, ChartSpec};

/// Universe pinned by the standalone SEPA page.
pub const BOTTOM100_UNIVERSE_ID: &str = "sp500_bottom100";

pub const NO_RECORDS: &str = "No records";
pub const NO_SEPA: &str = "No SEPA candidates";
pub const NO_ANALYST: &str = "No analyst data";
pub const NO_CHARTS: &str = "No charts available";

const CHART_JS_SRC: &str = "https://cdn.jsdelivr.net/npm/chart.js";

const STYLESHEET: &str = "<style>:root{--bg:#f6f3ec;--card:#fffdf8;--ink:#1b1a17;--muted:#6d6457;--line:#e2dccf;--buy:#0f5132;--sell:#8a2c0d;--hold:#6d6457}*{box-sizing:border-box}body{margin:0;background:var(--bg);color:var(--ink);font-family:\"IBM Plex Sans\",\"Segoe UI\",sans-serif}.shell{max-width:1200px;margin:0 auto;padding:24px 16px}header h1{margin:0 0 4px;font-size:1.5rem}.as-of{color:var(--muted);margin:0 0 12px}.stats{display:flex;gap:16px;flex-wrap:wrap;margin:12px 0}.stat{background:var(--card);border:1px solid var(--line);border-radius:10px;padding:8px 12px}.stat b{display:block;font-size:1.2rem}.tabs{display:flex;gap:6px;flex-wrap:wrap;margin:8px 0}.tab{border:1px solid var(--line);background:var(--card);border-radius:999px;padding:4px 12px;font:inherit}.tab.is-active{background:var(--ink);color:#fff}.card{background:var(--card);border:1px solid var(--line);border-radius:12px;padding:12px 16px;margin-top:14px}.is-hidden{display:none}.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(320px,1fr));gap:14px}.table{width:100%;border-collapse:collapse}.table th,.table td{text-align:left;padding:6px 8px;border-bottom:1px solid var(--line);font-size:.9rem}.badge{display:inline-block;border-radius:6px;padding:1px 6px;font-size:.75rem;font-weight:700;color:#fff}.badge.buy{background:var(--buy)}.badge.sell{background:var(--sell)}.badge.hold{background:var(--hold)}.chart-card h3{margin:0}.chart-meta{color:var(--muted);margin:2px 0 8px}</style>\n";

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn badge(record: &SignalRecord) -> String {
    let label = record.action.label();
    format!(
        "<span class=\"badge {}\">{}</span>",
        label.to_ascii_lowercase(),
        label
    )
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut out = String::from("<table class=\"table\"><thead><tr>");
    for header in headers {
        out.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    out.push_str("</tr></thead><tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&cell);
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody></table>");
    out
}

fn empty(message: &str) -> String {
    format!("<p class=\"empty\">{message}</p>")
}

/// Ticker / Rank / Composite / Momentum / Action. Cells are pre-escaped.
pub fn signal_table(rows: &[SignalRecord]) -> String {
    if rows.is_empty() {
        return empty(NO_RECORDS);
    }
    let body = rows
        .iter()
        .map(|r| {
            vec![
                escape_html(&r.ticker),
                r.rank.to_string(),
                format::score(r.composite_score),
                format::score(r.momentum_score),
                badge(r),
            ]
        })
        .collect();
    table(&["Ticker", "Rank", "Composite", "Momentum", "Action"], body)
}

pub fn sepa_table(rows: &[SepaRecord]) -> String {
    if rows.is_empty() {
        return empty(NO_SEPA);
    }
    let body = rows
        .iter()
        .map(|r| {
            vec![
                escape_html(&r.ticker),
                format::score(r.rs_score),
                format::price(r.ma50),
                format::price(r.ma150),
                format::price(r.ma200),
            ]
        })
        .collect();
    table(&["Ticker", "RS Score", "MA 50", "MA 150", "MA 200"], body)
}

pub fn analyst_table(rows: &[AnalystRecord]) -> String {
    if rows.is_empty() {
        return empty(NO_ANALYST);
    }
    let body = rows
        .iter()
        .map(|r| {
            vec![
                escape_html(&r.ticker),
                escape_html(&format::text(r.consensus.as_deref())),
                format::count(r.analyst_count),
                format::price(r.target_consensus),
                format::price(r.target_low),
                format::price(r.target_high),
            ]
        })
        .collect();
    table(
        &["Ticker", "Consensus", "Analysts", "Target", "Low", "High"],
        body,
    )
}

fn chart_cards(specs: &[ChartSpec]) -> String {
    if specs.is_empty() {
        return empty(NO_CHARTS);
    }
    let mut out = String::from("<div class=\"grid\">\n");
    for spec in specs {
        out.push_str(&format!(
            "<div class=\"chart-card\"><h3>{}</h3><p class=\"chart-meta\">{}</p><canvas id=\"{}\" height=\"180\"></canvas></div>\n",
            escape_html(&spec.ticker),
            escape_html(&spec.meta_line()),
            escape_html(&spec.id)
        ));
    }
    out.push_str("</div>");
    out
}

/// `[{ "id": "chart-0", "config": {...} }, ...]`
pub fn chart_payload(specs: &[ChartSpec]) -> Value {
    Value::Array(
        specs
            .iter()
            .map(|spec| json!({ "id": spec.id, "ticker": spec.ticker, "config": spec.to_chartjs() }))
            .collect(),
    )
}

/// Chart bootstrap: destroy whatever a previous render left behind, then
/// create one chart per canvas.
fn chart_script(specs: &[ChartSpec]) -> String {
    if specs.is_empty() {
        return String::new();
    }
    // `</` inside a script body would close the element early.
    let payload = chart_payload(specs).to_string().replace("</", "<\\/");
    let mut out = format!("<script src=\"{CHART_JS_SRC}\"></script>\n<script>\n");
    out.push_str(&format!("const RANKBOARD_CHARTS = {payload};\n"));
    out.push_str(
        "(window.rankboardCharts || []).forEach((chart) => chart.destroy());\n\
         window.rankboardCharts = RANKBOARD_CHARTS.map((item) =>\n  \
         new Chart(document.getElementById(item.id), item.config));\n",
    );
    out.push_str("</script>\n");
    out
}

fn section(id: &str, title: &str, visible: bool, body: &str) -> String {
    let class = if visible { "card" } else { "card is-hidden" };
    format!("<section id=\"{id}\" class=\"{class}\"><h2>{title}</h2>\n{body}\n</section>\n")
}

fn stat(label: &str, id: &str, value: impl std::fmt::Display) -> String {
    format!("<div class=\"stat\">{label}<b id=\"{id}\">{value}</b></div>")
}

fn page_open(title: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str(STYLESHEET);
    out.push_str("</head><body><main class=\"shell\">\n");
    out
}

fn page_close(out: &mut String) {
    out.push_str("</main></body></html>\n");
}

fn header_block(signal_name: &str, as_of: &str) -> String {
    format!(
        "<header><h1 id=\"signalName\">{}</h1><p id=\"asOf\" class=\"as-of\">{}</p></header>\n",
        escape_html(signal_name),
        escape_html(as_of)
    )
}

fn tab_strip(board: &Board) -> String {
    let mut out = String::new();
    if !board.tabs.is_empty() {
        out.push_str("<nav id=\"universeTabs\" class=\"tabs\">");
        for tab in &board.tabs {
            let class = if tab.active { "tab is-active" } else { "tab" };
            out.push_str(&format!(
                "<button class=\"{class}\" data-universe=\"{}\">{}</button>",
                escape_html(&tab.id),
                escape_html(&tab.name)
            ));
        }
        out.push_str("</nav>\n");
    }
    if let Some(active) = board.view {
        out.push_str("<nav id=\"viewTabs\" class=\"tabs\">");
        for view in rankboard_core::ViewSelection::ALL {
            let class = if view == active { "tab is-active" } else { "tab" };
            out.push_str(&format!(
                "<button class=\"{class}\" data-view=\"{}\">{}</button>",
                view.id(),
                view.label()
            ));
        }
        out.push_str("</nav>\n");
    }
    out
}

fn render_board(board: &Board) -> String {
    let multi_view = board.view.is_some();
    let mut out = page_open(&board.header.signal_name);
    out.push_str(&header_block(
        &board.header.signal_name,
        &board.header.as_of_line(),
    ));
    out.push_str(&tab_strip(board));

    out.push_str("<div class=\"stats\">");
    out.push_str(&stat("Buys", "buyCount", board.counts.buy));
    out.push_str(&stat("Sells", "sellCount", board.counts.sell));
    out.push_str(&stat("Universe", "universeSize", board.counts.universe_size));
    if multi_view {
        out.push_str(&stat("SEPA", "sepaCount", board.counts.sepa_count));
    }
    out.push_str("</div>\n");

    let vis = board.visibility;
    let signals = format!(
        "<div class=\"grid\"><div><h3>Buy</h3>{}</div><div><h3>Sell</h3>{}</div></div>",
        signal_table(&board.buys),
        signal_table(&board.sells)
    );
    out.push_str(&section("signalSection", "Signals", vis.signals, &signals));
    out.push_str(&section(
        "fullSection",
        "Full ranking",
        vis.full_table,
        &signal_table(&board.filtered_full),
    ));

    // Legacy documents have no analyst, SEPA or chart sections at all.
    let mut specs = Vec::new();
    if multi_view {
        out.push_str(&section(
            "analystSection",
            "Analyst consensus",
            vis.analyst,
            &analyst_table(&board.analyst_panel),
        ));
        out.push_str(&section(
            "sepaSection",
            "SEPA candidates",
            vis.sepa,
            &sepa_table(&board.sepa_candidates),
        ));
        specs = chart_specs(&board.sepa_charts);
        out.push_str(&section(
            "sepaChartsSection",
            "SEPA charts",
            vis.charts,
            &chart_cards(&specs),
        ));
    }

    if vis.charts {
        out.push_str(&chart_script(&specs));
    }
    page_close(&mut out);
    out
}

/// Render the dashboard page for a reconciled model.
pub fn render_page(model: &RenderModel) -> String {
    match model {
        RenderModel::Board(board) => render_board(board),
        RenderModel::NoData {
            signal_name,
            message,
        } => {
            let mut out = page_open(signal_name);
            out.push_str(&header_block(signal_name, message));
            page_close(&mut out);
            out
        }
    }
}

/// The pinned SEPA-only page for one universe: header, universe size, SEPA
/// count, the candidate table and every chart.
pub fn render_sepa_page(dataset: &Dataset, universe_id: &str) -> Result<String> {
    let universe = dataset
        .universe(universe_id)
        .ok_or_else(|| anyhow!("universe '{universe_id}' not found"))?;

    let mut as_of = format!("As of {} | {}", dataset.as_of_date, universe.name);
    if let Some(fundamentals) = &dataset.fundamentals_as_of {
        as_of.push_str(&format!(" | Fundamentals {fundamentals}"));
    }

    let specs = chart_specs(universe.sepa_charts.as_deref().unwrap_or_default());
    let mut out = page_open(&format!("{} SEPA", universe.name));
    out.push_str(&header_block(&dataset.signal_name, &as_of));
    out.push_str("<div class=\"stats\">");
    out.push_str(&stat("Universe", "universeSize", universe.universe_size));
    out.push_str(&stat(
        "SEPA",
        "sepaCount",
        universe.sepa_count.unwrap_or(0),
    ));
    out.push_str("</div>\n");
    out.push_str(&section(
        "sepaSection",
        "SEPA candidates",
        true,
        &sepa_table(universe.sepa_candidates.as_deref().unwrap_or_default()),
    ));
    out.push_str(&section(
        "sepaChartsSection",
        "SEPA charts",
        true,
        &chart_cards(&specs),
    ));
    out.push_str(&chart_script(&specs));
    page_close(&mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankboard_core::{parse_document, reconcile, Session, ViewSelection};

    const DOC: &[u8] = br#"{"as_of_date":"2025-01-31","signal":"Composite <momentum>",
        "universes":[{"id":"sp500_bottom100","name":"S&P 500 Bottom 100",
          "records":[{"ticker":"F","rank":1,"composite_score":0.25,"action":"BUY"}],
          "sepa_count":1,
          "sepa_candidates":[{"ticker":"F","rs_score":null,"ma_50":12.5,"ma_150":null,"ma_200":null}],
          "sepa_charts":[{"ticker":"F","rs_score":0.8,"dates":["d1"],"close":[1.0],
                          "ma50":[null],"ma150":[null],"ma200":[null]}]}]}"#;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn empty_tables_show_messages() {
        assert!(signal_table(&[]).contains(NO_RECORDS));
        assert!(sepa_table(&[]).contains(NO_SEPA));
        assert!(analyst_table(&[]).contains(NO_ANALYST));
        assert!(chart_cards(&[]).contains(NO_CHARTS));
    }

    #[test]
    fn signals_view_hides_other_sections() {
        let ds = parse_document(DOC).unwrap();
        let html = render_page(&reconcile(&ds, &Session::default()));
        assert!(html.contains("<section id=\"signalSection\" class=\"card\">"));
        assert!(html.contains("<section id=\"sepaSection\" class=\"card is-hidden\">"));
        assert!(html.contains("<span class=\"badge buy\">BUY</span>"));
        assert!(html.contains("Composite &lt;momentum&gt;"));
        assert!(!html.contains("RANKBOARD_CHARTS"));
    }

    #[test]
    fn charts_view_emits_canvas_and_script() {
        let ds = parse_document(DOC).unwrap();
        let session = Session {
            view: ViewSelection::Charts,
            ..Session::default()
        };
        let html = render_page(&reconcile(&ds, &session));
        assert!(html.contains("<canvas id=\"chart-0\" height=\"180\">"));
        assert!(html.contains("RS score: 0.8000"));
        assert!(html.contains("chart.destroy()"));
        assert!(html.contains("\"borderColor\":\"#1b1a17\""));
    }

    #[test]
    fn sepa_page_formats_nulls() {
        let ds = parse_document(DOC).unwrap();
        let html = render_sepa_page(&ds, BOTTOM100_UNIVERSE_ID).unwrap();
        assert!(html.contains("As of 2025-01-31 | S&amp;P 500 Bottom 100"));
        assert!(html.contains("<td>F</td><td>-</td><td>12.50</td><td>-</td><td>-</td>"));
        assert!(!html.contains("null</td>"));
    }

    #[test]
    fn sepa_page_requires_universe() {
        let ds = parse_document(DOC).unwrap();
        let err = render_sepa_page(&ds, "nasdaq").unwrap_err();
        assert_eq!(err.to_string(), "universe 'nasdaq' not found");
    }

    #[test]
    fn no_data_page_shows_message() {
        let ds = parse_document(br#"{"signal":"Composite","universes":[]}"#).unwrap();
        let html = render_page(&reconcile(&ds, &Session::default()));
        assert!(html.contains("No universes available."));
        assert!(!html.contains("<table"));
    }
}
