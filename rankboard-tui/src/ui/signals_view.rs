//! Signals view: buy/sell partitions on top, filtered full ranking and the
//! analyst panel below. Legacy documents only ever show this view, without
//! the analyst panel.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use rankboard_core::{Board, SignalRecord};

use crate::app::{AppState, SignalsPane};
use crate::ui::tables;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, board: &Board) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    signal_pane(f, top[0], app, "Buy", &board.buys, SignalsPane::Buys);
    signal_pane(f, top[1], app, "Sell", &board.sells, SignalsPane::Sells);

    if board.visibility.analyst {
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        signal_pane(
            f,
            bottom[0],
            app,
            "Full ranking",
            &board.filtered_full,
            SignalsPane::Full,
        );
        tables::render_analyst_table(
            f,
            bottom[1],
            &board.analyst_panel,
            app.pane_offset(SignalsPane::Analyst),
            app.focus == SignalsPane::Analyst,
        );
    } else {
        signal_pane(
            f,
            rows[1],
            app,
            "Full ranking",
            &board.filtered_full,
            SignalsPane::Full,
        );
    }
}

fn signal_pane(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    title: &str,
    records: &[SignalRecord],
    pane: SignalsPane,
) {
    tables::render_signal_table(
        f,
        area,
        title,
        records,
        app.pane_offset(pane),
        app.focus == pane,
    );
}
