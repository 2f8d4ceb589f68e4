//! Terminal chart surface: turns chart specs into point buffers that the
//! ratatui `Chart` widget can draw.
//!
//! A terminal chart has a single y axis, so the RS line is rescaled onto the
//! price range of its own chart before plotting.

use ratatui::style::Color;

use rankboard_render::{Axis, ChartSpec, ChartSurface};

use crate::theme;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub label: String,
    pub color: Color,
    pub dashed: bool,
    pub points: Vec<(f64, f64)>,
}

/// One chart's drawable state.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalChart {
    pub ticker: String,
    pub meta: String,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub lines: Vec<PlotLine>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl TerminalChart {
    pub fn has_points(&self) -> bool {
        self.lines.iter().any(|l| !l.points.is_empty())
    }
}

fn points(values: &[Option<f64>]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|v| v.is_finite()).map(|v| (i as f64, v)))
        .collect()
}

fn bounds<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<[f64; 2]> {
    points.fold(None, |acc, &(_, y)| match acc {
        None => Some([y, y]),
        Some([lo, hi]) => Some([lo.min(y), hi.max(y)]),
    })
}

/// Map `points` linearly from their own range onto `target`.
fn rescale(points: &mut [(f64, f64)], target: [f64; 2]) {
    let Some([lo, hi]) = bounds(points.iter()) else {
        return;
    };
    let span = hi - lo;
    for (_, y) in points.iter_mut() {
        *y = if span > 0.0 {
            target[0] + (*y - lo) / span * (target[1] - target[0])
        } else {
            (target[0] + target[1]) / 2.0
        };
    }
}

pub fn build_chart(spec: &ChartSpec) -> TerminalChart {
    let mut primary: Vec<PlotLine> = Vec::new();
    let mut secondary: Vec<PlotLine> = Vec::new();
    for line in &spec.lines {
        let plot = PlotLine {
            label: line.label.to_string(),
            color: theme::line_color(line.style.color),
            dashed: line.style.dash.is_some(),
            points: points(&line.values),
        };
        match line.axis {
            Axis::Primary => primary.push(plot),
            Axis::Secondary => secondary.push(plot),
        }
    }

    let y = bounds(primary.iter().flat_map(|l| l.points.iter()))
        .or_else(|| bounds(secondary.iter().flat_map(|l| l.points.iter())))
        .unwrap_or([0.0, 1.0]);
    let pad = ((y[1] - y[0]).abs() * 0.05).max(0.01);
    let y_bounds = [y[0] - pad, y[1] + pad];

    for line in &mut secondary {
        rescale(&mut line.points, y);
        line.label.push_str(" (rescaled)");
    }
    primary.extend(secondary);

    TerminalChart {
        ticker: spec.ticker.clone(),
        meta: spec.meta_line(),
        first_date: spec.labels.first().cloned(),
        last_date: spec.labels.last().cloned(),
        lines: primary,
        x_bounds: [0.0, spec.labels.len().saturating_sub(1).max(1) as f64],
        y_bounds,
    }
}

/// Keeps the drawable charts as registry handles and counts disposals.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    pub created: usize,
    pub disposed: usize,
}

impl ChartSurface for TerminalSurface {
    type Handle = TerminalChart;

    fn create(&mut self, spec: &ChartSpec) -> TerminalChart {
        self.created += 1;
        build_chart(spec)
    }

    fn destroy(&mut self, handle: TerminalChart) {
        self.disposed += 1;
        drop(handle);
    }
}
