//! Bottom status bar: key hints, dataset digest, last status or error.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    let hints = if app.multi_view() {
        " 1-3:view [ ]:universe h/l:table /:search a:action r:reload ?:help"
    } else {
        " h/l:table /:search a:action r:reload ?:help"
    };
    spans.push(Span::styled(hints, theme::muted()));

    if let Some(dataset) = &app.dataset {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("#{}", dataset.short_digest()),
            theme::accent(),
        ));
    }
    if app.loading {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("loading", theme::warning()));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
