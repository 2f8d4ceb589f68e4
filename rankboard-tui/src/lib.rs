//! RankBoard TUI: terminal dashboard over a ranked signal document.
//!
//! The binary in `main.rs` owns the terminal and the event loop; everything
//! it drives lives here so it can be exercised without a terminal:
//! - `app`: single-owner state (dataset, session, reconciled model, charts)
//! - `input`: key dispatch
//! - `worker`: the background loader thread
//! - `chart_surface`: chart specs turned into terminal point buffers
//! - `ui`: ratatui drawing

pub mod app;
pub mod chart_surface;
pub mod input;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::{AppState, LoadSettings};
