//! Top-level UI layout: header, active view, status bar, overlays.

pub mod charts_view;
pub mod overlays;
pub mod sepa_view;
pub mod signals_view;
pub mod status_bar;
pub mod tables;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use rankboard_core::{ActionFilter, Board, RenderModel, ViewSelection};

use crate::app::{AppState, Overlay};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    match &app.model {
        RenderModel::Board(board) => {
            draw_header(f, chunks[0], app, board);
            draw_view(f, chunks[1], app, board);
        }
        RenderModel::NoData {
            signal_name,
            message,
        } => draw_no_data(f, chunks[0].union(chunks[1]), signal_name, message),
    }

    status_bar::render(f, chunks[2], app);

    match app.overlay {
        Overlay::Search => overlays::render_search(f, chunks[1], app),
        Overlay::Help => overlays::render_help(f, chunks[1]),
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[1], app),
        Overlay::None => {}
    }
}

fn draw_no_data(f: &mut Frame, area: Rect, signal_name: &str, message: &str) {
    let title = if signal_name.is_empty() {
        " RankBoard ".to_string()
    } else {
        format!(" {signal_name} ")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(title)
        .title_style(theme::panel_title(true));
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme::muted())),
        Line::from(""),
        Line::from(Span::styled("r: reload   ?: help   q: quit", theme::muted())),
    ];
    let para = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

/// Signal name, as-of line, universe tabs and view tabs.
fn draw_header(f: &mut Frame, area: Rect, app: &AppState, board: &Board) {
    let mut lines = vec![Line::from(vec![
        Span::styled(board.header.signal_name.clone(), theme::header()),
        Span::raw("  "),
        Span::styled(board.header.as_of_line(), theme::muted()),
    ])];

    let mut tabs: Vec<Span> = Vec::new();
    for tab in &board.tabs {
        tabs.push(Span::styled(format!(" {} ", tab.name), theme::tab(tab.active)));
        tabs.push(Span::raw(" "));
    }
    if !tabs.is_empty() {
        tabs.insert(0, Span::styled("[ ] ", theme::muted()));
    }
    lines.push(Line::from(tabs));

    let mut views: Vec<Span> = Vec::new();
    if let Some(active) = board.view {
        for view in ViewSelection::ALL {
            views.push(Span::styled(
                format!(" {}:{} ", view.index() + 1, view.label()),
                theme::tab(view == active),
            ));
            views.push(Span::raw(" "));
        }
    }
    views.push(Span::styled(
        format!(
            " Buys {}  Sells {}  Universe {}",
            board.counts.buy, board.counts.sell, board.counts.universe_size
        ),
        theme::text(),
    ));
    if board.view.is_some() {
        views.push(Span::styled(
            format!("  SEPA {}", board.counts.sepa_count),
            theme::text(),
        ));
    }
    let filter = &app.session.filter;
    if !filter.query.is_empty() || filter.action != ActionFilter::All {
        views.push(Span::styled(
            format!("  filter: \"{}\" {}", filter.query, filter.action),
            theme::warning(),
        ));
    }
    lines.push(Line::from(views));

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_view(f: &mut Frame, area: Rect, app: &AppState, board: &Board) {
    let view = app.active_view();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", view.label(), view.index() + 1))
        .title_style(theme::panel_title(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match view {
        ViewSelection::Signals => signals_view::render(f, inner, app, board),
        ViewSelection::Sepa => sepa_view::render(f, inner, app, board),
        ViewSelection::Charts => charts_view::render(f, inner, app),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
