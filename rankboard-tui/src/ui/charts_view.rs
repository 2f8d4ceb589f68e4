//! Charts view: a page of SEPA price charts drawn from the registry's live
//! buffers. `j`/`k` page through them.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph,
};
use ratatui::Frame;

use crate::app::{AppState, CHARTS_PER_PAGE};
use crate::chart_surface::TerminalChart;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let live = app.charts.live();
    if live.is_empty() {
        let para = Paragraph::new(Span::styled(
            rankboard_render::html::NO_CHARTS,
            theme::muted(),
        ));
        f.render_widget(para, area);
        return;
    }

    let start = (app.scroll * CHARTS_PER_PAGE).min(live.len() - 1);
    let page = &live[start..(start + CHARTS_PER_PAGE).min(live.len())];
    let pages = live.len().div_ceil(CHARTS_PER_PAGE);

    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, CHARTS_PER_PAGE as u32); CHARTS_PER_PAGE])
        .split(area);

    for (i, (chart, slot)) in page.iter().zip(slots.iter()).enumerate() {
        let title = format!(
            " {} | {} | {}/{} ",
            chart.ticker,
            chart.meta,
            start + i + 1,
            live.len()
        );
        render_chart(f, *slot, chart, title, app.scroll + 1, pages);
    }
}

fn render_chart(
    f: &mut Frame,
    area: Rect,
    chart: &TerminalChart,
    title: String,
    page: usize,
    pages: usize,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(title)
        .title_style(theme::accent_bold())
        .title_bottom(Span::styled(format!(" page {page}/{pages} "), theme::muted()));

    if !chart.has_points() {
        let para = Paragraph::new(Span::styled("No price history", theme::muted())).block(block);
        f.render_widget(para, area);
        return;
    }

    let datasets: Vec<Dataset> = chart
        .lines
        .iter()
        .map(|line| {
            Dataset::default()
                .name(line.label.clone())
                .marker(if line.dashed {
                    Marker::Dot
                } else {
                    Marker::Braille
                })
                .graph_type(GraphType::Line)
                .style(Style::default().fg(line.color))
                .data(&line.points)
        })
        .collect();

    let [y_min, y_max] = chart.y_bounds;
    let x_labels = vec![
        Span::styled(chart.first_date.clone().unwrap_or_default(), theme::muted()),
        Span::styled(chart.last_date.clone().unwrap_or_default(), theme::muted()),
    ];
    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(chart.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(chart.y_bounds)
                .labels(vec![
                    Span::styled(format!("{y_min:.2}"), theme::muted()),
                    Span::styled(format!("{y_max:.2}"), theme::muted()),
                ]),
        )
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    f.render_widget(widget, area);
}
