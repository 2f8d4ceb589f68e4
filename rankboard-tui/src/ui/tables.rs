//! Shared table widgets. Every cell goes through `rankboard_core::format`, so
//! the terminal shows the same placeholders as the HTML page.

use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use rankboard_core::{format, AnalystRecord, SepaRecord, SignalRecord};

use crate::theme;

fn block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(title)
        .title_style(theme::panel_title(focused))
}

fn render_empty(f: &mut Frame, area: Rect, title: String, message: &str) {
    let para = Paragraph::new(Span::styled(message.to_string(), theme::muted()))
        .block(block(title, false));
    f.render_widget(para, area);
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().copied()).style(theme::header())
}

/// Visible window title: `Buy (12)` or `Full ranking (3-20 of 48)`.
fn window_title(title: &str, offset: usize, shown: usize, total: usize) -> String {
    if offset == 0 && shown >= total {
        format!(" {title} ({total}) ")
    } else {
        format!(
            " {title} ({}-{} of {total}) ",
            offset + 1,
            (offset + shown).min(total)
        )
    }
}

/// Rows that fit inside `area` after borders and the header row.
fn capacity(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

pub fn signal_rows(records: &[SignalRecord]) -> Vec<Row<'static>> {
    records
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.ticker.clone()),
                Cell::from(r.rank.to_string()),
                Cell::from(format::score(r.composite_score)),
                Cell::from(format::score(r.momentum_score)),
                Cell::from(Span::styled(r.action.label(), theme::action(r.action))),
            ])
        })
        .collect()
}

pub fn sepa_rows(records: &[SepaRecord]) -> Vec<Row<'static>> {
    records
        .iter()
        .map(|r| {
            Row::new(vec![
                r.ticker.clone(),
                format::score(r.rs_score),
                format::price(r.ma50),
                format::price(r.ma150),
                format::price(r.ma200),
            ])
        })
        .collect()
}

pub fn analyst_rows(records: &[AnalystRecord]) -> Vec<Row<'static>> {
    records
        .iter()
        .map(|r| {
            Row::new(vec![
                r.ticker.clone(),
                format::text(r.consensus.as_deref()),
                format::count(r.analyst_count),
                format::price(r.target_consensus),
                format::price(r.target_low),
                format::price(r.target_high),
            ])
        })
        .collect()
}

/// Ticker / Rank / Composite / Momentum / Action, starting at row `offset`.
pub fn render_signal_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    records: &[SignalRecord],
    offset: usize,
    focused: bool,
) {
    if records.is_empty() {
        render_empty(f, area, format!(" {title} "), rankboard_render::html::NO_RECORDS);
        return;
    }
    let offset = offset.min(records.len() - 1);
    let window = &records[offset..(offset + capacity(area)).min(records.len())];
    let table = Table::new(
        signal_rows(window),
        [
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(6),
        ],
    )
    .header(header(&["Ticker", "Rank", "Composite", "Momentum", "Action"]))
    .block(block(
        window_title(title, offset, window.len(), records.len()),
        focused,
    ));
    f.render_widget(table, area);
}

pub fn render_sepa_table(f: &mut Frame, area: Rect, records: &[SepaRecord], offset: usize) {
    let title = "SEPA candidates";
    if records.is_empty() {
        render_empty(f, area, format!(" {title} "), rankboard_render::html::NO_SEPA);
        return;
    }
    let offset = offset.min(records.len() - 1);
    let window = &records[offset..(offset + capacity(area)).min(records.len())];
    let table = Table::new(
        sepa_rows(window),
        [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header(&["Ticker", "RS Score", "MA 50", "MA 150", "MA 200"]))
    .block(block(
        window_title(title, offset, window.len(), records.len()),
        true,
    ));
    f.render_widget(table, area);
}

pub fn render_analyst_table(
    f: &mut Frame,
    area: Rect,
    records: &[AnalystRecord],
    offset: usize,
    focused: bool,
) {
    let title = "Analyst consensus";
    if records.is_empty() {
        render_empty(f, area, format!(" {title} "), rankboard_render::html::NO_ANALYST);
        return;
    }
    let offset = offset.min(records.len() - 1);
    let window = &records[offset..(offset + capacity(area)).min(records.len())];
    let table = Table::new(
        analyst_rows(window),
        [
            Constraint::Length(7),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header(&["Ticker", "Consensus", "Analysts", "Target", "Low", "High"]))
    .block(block(
        window_title(title, offset, window.len(), records.len()),
        focused,
    ));
    f.render_widget(table, area);
}
