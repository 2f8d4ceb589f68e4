//! Overlay widgets: ticker search, key help, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// Live ticker search. The table behind the popup updates on every keystroke.
pub fn render_search(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(50, 30, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Search tickers [Enter]keep [Esc]clear ")
        .title_style(theme::accent_bold());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let matches = app
        .model
        .board()
        .map(|b| b.filtered_full.len())
        .unwrap_or(0);
    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(app.session.filter.query.as_str(), theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{matches} match(es), action filter {}",
                app.session.filter.action
            ),
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(text), inner);
}

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [Esc]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();
    section(&mut lines, "Views");
    key(&mut lines, "1 / 2 / 3", "Signals / SEPA / Charts");
    key(&mut lines, "Tab / Shift+Tab", "Cycle views forward / back");
    key(&mut lines, "[ / ]", "Previous / next universe");
    lines.push(Line::from(""));

    section(&mut lines, "Filter");
    key(&mut lines, "/", "Search tickers (live)");
    key(&mut lines, "a", "Cycle action: ALL, BUY, SELL, HOLD");
    lines.push(Line::from(""));

    section(&mut lines, "Navigation");
    key(&mut lines, "h / l", "Focus previous / next table");
    key(&mut lines, "j / k", "Scroll focused table or chart page");
    key(&mut lines, "g / G", "Top / bottom");
    lines.push(Line::from(""));

    section(&mut lines, "Other");
    key(&mut lines, "r", "Reload the document");
    key(&mut lines, "e", "Error history");
    key(&mut lines, "?", "This help");
    key(&mut lines, "q", "Quit");

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn section(lines: &mut Vec<Line<'static>>, title: &'static str) {
    lines.push(Line::from(Span::styled(title, theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'static>>, keys: &'static str, what: &'static str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::warning()),
        Span::styled(what, theme::muted()),
    ]));
}

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));
        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }
    f.render_widget(Paragraph::new(lines), inner);
}
