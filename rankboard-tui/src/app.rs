//! Application state: single-owner, main-thread only.
//!
//! The dataset, the session and the reconciled model all live here. Every
//! session change goes through `refresh`, which re-runs the reconciler and
//! swaps the chart buffers. The loader thread talks to us over channels.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use chrono::NaiveDateTime;

use rankboard_core::{
    reconcile, Board, Dataset, LoadError, RenderModel, Session, SourceSpec, ValidationPolicy,
    ViewSelection,
};
use rankboard_render::{chart_specs, ChartRegistry};

use crate::chart_surface::TerminalSurface;
use crate::worker::{WorkerCommand, WorkerResponse};

/// Error history is capped at this many entries.
pub const MAX_ERRORS: usize = 50;

/// Charts shown per page in the chart view.
pub const CHARTS_PER_PAGE: usize = 2;

/// Main-panel message when the first load fails and there is nothing to show.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Other => "ERR",
        }
    }

    pub fn of(error: &LoadError) -> Self {
        match error {
            LoadError::Network { .. } | LoadError::HttpStatus { .. } => ErrorCategory::Network,
            LoadError::Io { .. }
            | LoadError::Encoding
            | LoadError::Parse(_)
            | LoadError::Malformed(_) => ErrorCategory::Data,
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Search,
    Help,
    ErrorHistory,
}

/// Tables of the Signals view. `j`/`k` scroll the focused one, `h`/`l` move
/// focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalsPane {
    Buys,
    Sells,
    #[default]
    Full,
    Analyst,
}

impl SignalsPane {
    pub const ALL: [SignalsPane; 4] = [
        SignalsPane::Buys,
        SignalsPane::Sells,
        SignalsPane::Full,
        SignalsPane::Analyst,
    ];

    fn index(self) -> usize {
        match self {
            SignalsPane::Buys => 0,
            SignalsPane::Sells => 1,
            SignalsPane::Full => 2,
            SignalsPane::Analyst => 3,
        }
    }

    fn len_in(self, board: &Board) -> usize {
        match self {
            SignalsPane::Buys => board.buys.len(),
            SignalsPane::Sells => board.sells.len(),
            SignalsPane::Full => board.filtered_full.len(),
            SignalsPane::Analyst => board.analyst_panel.len(),
        }
    }
}

/// Where and how to fetch the document.
#[derive(Debug, Clone)]
pub struct LoadSettings {
    pub source: SourceSpec,
    pub timeout: Duration,
    pub policy: ValidationPolicy,
}

pub struct AppState {
    pub running: bool,

    // Data and view state
    pub dataset: Option<Dataset>,
    pub session: Session,
    pub model: RenderModel,
    pub charts: ChartRegistry<TerminalSurface>,
    /// Row offset of the focused table, or page index in the chart view.
    pub scroll: usize,
    /// Focused table in the Signals view.
    pub focus: SignalsPane,
    /// Saved offsets of the unfocused Signals tables.
    pub pane_scroll: [usize; 4],

    // Loader
    pub load: LoadSettings,
    pub loading: bool,
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        session: Session,
        load: LoadSettings,
    ) -> Self {
        let model = RenderModel::NoData {
            signal_name: String::new(),
            message: format!("Loading {}...", load.source),
        };
        Self {
            running: true,
            dataset: None,
            session,
            model,
            charts: ChartRegistry::new(TerminalSurface::default()),
            scroll: 0,
            focus: SignalsPane::default(),
            pane_scroll: [0; 4],
            load,
            loading: false,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(MAX_ERRORS),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Ask the loader thread for a fresh copy of the document.
    pub fn request_load(&mut self) {
        if self.loading {
            self.set_warning("Load already in progress");
            return;
        }
        let cmd = WorkerCommand::Load {
            source: self.load.source.clone(),
            timeout: self.load.timeout,
            policy: self.load.policy,
        };
        if self.worker_tx.send(cmd).is_err() {
            self.push_error(
                ErrorCategory::Other,
                "Loader thread is not running".into(),
                self.load.source.to_string(),
            );
            return;
        }
        self.loading = true;
        if self.dataset.is_none() {
            self.model = RenderModel::NoData {
                signal_name: String::new(),
                message: format!("Loading {}...", self.load.source),
            };
        }
        self.set_status(format!("Loading {}...", self.load.source));
    }

    pub fn apply_response(&mut self, resp: WorkerResponse) {
        self.loading = false;
        match resp {
            WorkerResponse::Loaded {
                dataset,
                source,
                elapsed,
            } => {
                let unchanged = self
                    .dataset
                    .as_ref()
                    .is_some_and(|current| current.digest == dataset.digest);
                if unchanged {
                    self.set_status(format!(
                        "{source} unchanged (digest {})",
                        dataset.short_digest()
                    ));
                    return;
                }
                let universes = dataset.universes.len();
                let digest = dataset.short_digest().to_string();
                self.dataset = Some(*dataset);
                self.reset_scroll();
                self.refresh();
                self.set_status(format!(
                    "Loaded {universes} universe(s) from {source} in {}ms [{digest}]",
                    elapsed.as_millis()
                ));
            }
            WorkerResponse::LoadFailed { error, source } => {
                let category = ErrorCategory::of(&error);
                if self.dataset.is_none() {
                    self.model = RenderModel::NoData {
                        signal_name: String::new(),
                        message: LOAD_FAILED_MESSAGE.into(),
                    };
                }
                self.push_error(category, format!("Failed to load data: {error}"), source);
            }
        }
    }

    /// Re-run reconciliation and rebuild the chart buffers.
    pub fn refresh(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        self.model = reconcile(dataset, &self.session);
        let specs = match &self.model {
            RenderModel::Board(board) => chart_specs(&board.sepa_charts),
            RenderModel::NoData { .. } => Vec::new(),
        };
        self.charts.replace(&specs);
        if !self.signal_panes().contains(&self.focus) {
            self.focus = SignalsPane::Full;
        }
        self.clamp_scroll();
    }

    /// Session-driven controls only respond once a populated board exists.
    pub fn has_board(&self) -> bool {
        self.model.board().is_some()
    }

    pub fn multi_view(&self) -> bool {
        self.model.board().is_some_and(|b| b.view.is_some())
    }

    /// The view actually on screen (legacy documents always show signals).
    pub fn active_view(&self) -> ViewSelection {
        self.model
            .board()
            .and_then(|b| b.view)
            .unwrap_or(ViewSelection::Signals)
    }

    pub fn set_view(&mut self, view: ViewSelection) {
        if !self.multi_view() || self.session.view == view {
            return;
        }
        self.session.view = view;
        self.reset_scroll();
        self.refresh();
    }

    /// Step through universes in document order, wrapping at both ends.
    pub fn cycle_universe(&mut self, forward: bool) {
        let (Some(dataset), Some(board)) = (&self.dataset, self.model.board()) else {
            return;
        };
        let count = dataset.universes.len();
        if count < 2 {
            return;
        }
        let current = dataset
            .universes
            .iter()
            .position(|u| u.id == board.header.universe_id)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        let id = dataset.universes[next].id.clone();
        self.session.universe.select(id);
        self.reset_scroll();
        self.refresh();
    }

    pub fn cycle_action(&mut self) {
        self.session.filter.action = self.session.filter.action.next();
        self.reset_scroll();
        self.refresh();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.session.filter.push_char(c);
        self.reset_scroll();
        self.refresh();
    }

    pub fn pop_query_char(&mut self) {
        self.session.filter.pop_char();
        self.reset_scroll();
        self.refresh();
    }

    pub fn clear_query(&mut self) {
        self.session.filter.clear_query();
        self.reset_scroll();
        self.refresh();
    }

    /// Signals tables on screen, in focus order.
    pub fn signal_panes(&self) -> Vec<SignalsPane> {
        let analyst = self.model.board().is_some_and(|b| b.visibility.analyst);
        SignalsPane::ALL
            .into_iter()
            .filter(|pane| *pane != SignalsPane::Analyst || analyst)
            .collect()
    }

    /// Move focus to the next (or previous) Signals table, keeping each
    /// table's own offset.
    pub fn cycle_focus(&mut self, forward: bool) {
        if self.active_view() != ViewSelection::Signals {
            return;
        }
        let panes = self.signal_panes();
        let current = panes.iter().position(|p| *p == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % panes.len()
        } else {
            (current + panes.len() - 1) % panes.len()
        };
        self.pane_scroll[self.focus.index()] = self.scroll;
        self.focus = panes[next];
        self.scroll = self.pane_scroll[self.focus.index()];
        self.clamp_scroll();
    }

    /// Row offset a Signals table is drawn from.
    pub fn pane_offset(&self, pane: SignalsPane) -> usize {
        if pane == self.focus {
            self.scroll
        } else {
            self.pane_scroll[pane.index()]
        }
    }

    fn reset_scroll(&mut self) {
        self.scroll = 0;
        self.pane_scroll = [0; 4];
    }

    /// Largest useful scroll offset for the active view.
    pub fn scroll_limit(&self) -> usize {
        let Some(board) = self.model.board() else {
            return 0;
        };
        match self.active_view() {
            ViewSelection::Signals => self.focus.len_in(board).saturating_sub(1),
            ViewSelection::Sepa => board.sepa_candidates.len().saturating_sub(1),
            ViewSelection::Charts => self.charts.len().saturating_sub(1) / CHARTS_PER_PAGE,
        }
    }

    pub fn scroll_down(&mut self) {
        if self.scroll < self.scroll_limit() {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.scroll_limit());
        if let Some(board) = self.model.board() {
            for pane in SignalsPane::ALL {
                let limit = pane.len_in(board).saturating_sub(1);
                let offset = &mut self.pane_scroll[pane.index()];
                *offset = (*offset).min(limit);
            }
        }
    }

    /// Push an error to the history, capping at `MAX_ERRORS`.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        tracing::error!(category = category.label(), %context, "{message}");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > MAX_ERRORS {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
