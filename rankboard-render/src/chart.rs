//! Renderer-neutral chart specifications.
//!
//! A `ChartSpec` is built once per `ChartSeries` and carries the fixed line
//! styling. The HTML page turns it into a Chart.js config; the terminal
//! dashboard turns it into point buffers.

use rankboard_core::{format, ChartSeries};
use serde::Serialize;
use serde_json::{json, Value};

/// Which vertical axis a line is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Price axis on the left.
    Primary,
    /// Relative-strength axis on the right.
    Secondary,
}

impl Axis {
    fn chartjs_id(self) -> &'static str {
        match self {
            Axis::Primary => "y",
            Axis::Secondary => "y1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    /// `#rrggbb`
    pub color: &'static str,
    pub width: f64,
    /// `[dash, gap]` in pixels; solid when `None`.
    pub dash: Option<[u8; 2]>,
}

pub const CLOSE_STYLE: LineStyle = LineStyle {
    color: "#1b1a17",
    width: 2.0,
    dash: None,
};
pub const MA50_STYLE: LineStyle = LineStyle {
    color: "#0f5132",
    width: 1.5,
    dash: None,
};
pub const MA150_STYLE: LineStyle = LineStyle {
    color: "#b4572b",
    width: 1.5,
    dash: None,
};
pub const MA200_STYLE: LineStyle = LineStyle {
    color: "#6d6457",
    width: 1.5,
    dash: None,
};
pub const RS_LINE_STYLE: LineStyle = LineStyle {
    color: "#2a6f97",
    width: 1.0,
    dash: Some([6, 4]),
};

pub const RS_LINE_LABEL: &str = "RS Line";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: &'static str,
    pub values: Vec<Option<f64>>,
    pub style: LineStyle,
    pub axis: Axis,
}

/// One chart card: a ticker, its RS score and up to five lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// DOM id of the canvas (`chart-0`, `chart-1`, ...).
    pub id: String,
    pub ticker: String,
    pub rs_score: Option<f64>,
    pub labels: Vec<String>,
    pub lines: Vec<LineSeries>,
}

impl ChartSpec {
    pub fn from_series(index: usize, series: &ChartSeries) -> Self {
        let styles = [CLOSE_STYLE, MA50_STYLE, MA150_STYLE, MA200_STYLE];
        let mut lines: Vec<LineSeries> = series
            .price_series()
            .into_iter()
            .zip(styles)
            .map(|((label, values), style)| LineSeries {
                label,
                values: values.to_vec(),
                style,
                axis: Axis::Primary,
            })
            .collect();

        if let Some(rs) = series.visible_rs_line() {
            lines.push(LineSeries {
                label: RS_LINE_LABEL,
                values: rs.to_vec(),
                style: RS_LINE_STYLE,
                axis: Axis::Secondary,
            });
        }

        Self {
            id: format!("chart-{index}"),
            ticker: series.ticker.clone(),
            rs_score: series.rs_score,
            labels: series.dates.clone(),
            lines,
        }
    }

    /// `RS score: 0.9100` (or `RS score: -` when missing).
    pub fn meta_line(&self) -> String {
        format!("RS score: {}", format::score(self.rs_score))
    }

    pub fn has_secondary_axis(&self) -> bool {
        self.lines.iter().any(|l| l.axis == Axis::Secondary)
    }

    /// Chart.js `line` configuration. Null points stay `null` so the
    /// library draws a gap instead of a zero.
    pub fn to_chartjs(&self) -> Value {
        let datasets: Vec<Value> = self
            .lines
            .iter()
            .map(|line| {
                let mut ds = json!({
                    "label": line.label,
                    "data": line.values,
                    "borderColor": line.style.color,
                    "borderWidth": line.style.width,
                    "pointRadius": 0,
                    "tension": 0.2,
                });
                if let Some(dash) = line.style.dash {
                    ds["borderDash"] = json!(dash);
                }
                if line.axis == Axis::Secondary {
                    ds["yAxisID"] = json!(line.axis.chartjs_id());
                }
                ds
            })
            .collect();

        json!({
            "type": "line",
            "data": { "labels": self.labels, "datasets": datasets },
            "options": {
                "responsive": true,
                "scales": {
                    "x": { "ticks": { "maxTicksLimit": 6 } },
                    "y": { "position": "left", "ticks": { "maxTicksLimit": 5 } },
                    "y1": {
                        "position": "right",
                        "grid": { "drawOnChartArea": false },
                        "ticks": { "maxTicksLimit": 5 }
                    }
                },
                "plugins": {
                    "legend": {
                        "display": true,
                        "position": "bottom",
                        "labels": { "boxWidth": 10, "boxHeight": 10, "usePointStyle": true }
                    }
                }
            }
        })
    }
}

/// Specs for every chart in document order.
pub fn chart_specs(charts: &[ChartSeries]) -> Vec<ChartSpec> {
    charts
        .iter()
        .enumerate()
        .map(|(i, series)| ChartSpec::from_series(i, series))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(rs_line: Option<Vec<Option<f64>>>) -> ChartSeries {
        ChartSeries {
            ticker: "F".into(),
            rs_score: Some(0.91),
            dates: vec!["2025-01-30".into(), "2025-01-31".into()],
            close: vec![Some(10.0), Some(10.5)],
            ma50: vec![None, Some(10.1)],
            ma150: vec![None, None],
            ma200: vec![None, None],
            rs_line,
        }
    }

    #[test]
    fn four_price_lines_without_rs() {
        let spec = ChartSpec::from_series(0, &series(None));
        assert_eq!(spec.lines.len(), 4);
        assert_eq!(spec.id, "chart-0");
        assert!(!spec.has_secondary_axis());
        assert_eq!(spec.meta_line(), "RS score: 0.9100");
    }

    #[test]
    fn all_null_rs_line_is_omitted() {
        let spec = ChartSpec::from_series(0, &series(Some(vec![None, None])));
        assert_eq!(spec.lines.len(), 4);
    }

    #[test]
    fn rs_line_is_dashed_on_secondary_axis() {
        let spec = ChartSpec::from_series(3, &series(Some(vec![None, Some(1.02)])));
        assert_eq!(spec.lines.len(), 5);
        assert!(spec.has_secondary_axis());

        let config = spec.to_chartjs();
        let rs = &config["data"]["datasets"][4];
        assert_eq!(rs["label"], "RS Line");
        assert_eq!(rs["yAxisID"], "y1");
        assert_eq!(rs["borderDash"], json!([6, 4]));
        assert_eq!(rs["borderColor"], "#2a6f97");
    }

    #[test]
    fn chartjs_config_keeps_nulls_and_styling() {
        let config = ChartSpec::from_series(0, &series(None)).to_chartjs();
        let close = &config["data"]["datasets"][0];
        assert_eq!(close["borderColor"], "#1b1a17");
        assert_eq!(close["borderWidth"], 2.0);
        assert!(close.get("yAxisID").is_none());
        assert_eq!(config["data"]["datasets"][1]["data"][0], Value::Null);
        assert_eq!(config["options"]["scales"]["x"]["ticks"]["maxTicksLimit"], 6);
        assert_eq!(config["options"]["plugins"]["legend"]["position"], "bottom");
    }
}
