//! RankBoard Render: turns a reconciled `RenderModel` into files.
//!
//! - `chart`: renderer-neutral chart specs with the fixed line styling, and
//!   their Chart.js configuration
//! - `registry`: dispose-before-create lifetime tracking for drawn charts
//! - `html`: the static dashboard page and the pinned SEPA page
//! - `export`: CSV / JSON exports and the on-disk site bundle

pub mod chart;
pub mod export;
pub mod html;
pub mod registry;

pub use chart::{chart_specs, Axis, ChartSpec, LineSeries, LineStyle};
pub use export::{
    export_charts_json, export_model_json, export_table_csv, write_sepa_page, write_site,
};
pub use html::{escape_html, render_page, render_sepa_page, BOTTOM100_UNIVERSE_ID};
pub use registry::{ChartRegistry, ChartSurface};
