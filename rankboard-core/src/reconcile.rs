//! View-state reconciliation.
//!
//! `reconcile` is the only place where the dataset meets the session. It is a
//! pure function: same inputs, structurally identical `RenderModel`. Renderers
//! consume the model one-way and never write back into the session.

use serde::Serialize;

use crate::model::{Action, AnalystRecord, ChartSeries, Dataset, SepaRecord, SignalRecord, Universe};
use crate::session::{Session, UniverseSelection, ViewSelection};

/// Status text for a dataset whose `universes` array is empty.
pub const NO_UNIVERSES_MESSAGE: &str = "No universes available.";

/// Page header values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub as_of_date: String,
    pub fundamentals_as_of: Option<String>,
    pub universe_id: String,
    pub universe_name: String,
    pub signal_name: String,
    /// Legacy single-universe documents have no universe name to show.
    pub show_universe: bool,
}

impl Header {
    /// `As of 2025-01-31 | S&P 500 Top 50 | Fundamentals 2025-01-30`
    pub fn as_of_line(&self) -> String {
        let mut line = format!("As of {}", self.as_of_date);
        if self.show_universe {
            line.push_str(" | ");
            line.push_str(&self.universe_name);
            if let Some(fundamentals) = &self.fundamentals_as_of {
                line.push_str(" | Fundamentals ");
                line.push_str(fundamentals);
            }
        }
        line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub buy: usize,
    pub sell: usize,
    pub universe_size: usize,
    pub sepa_count: usize,
}

/// Which sections are on screen.
///
/// In a multi-view document exactly one of {signals, sepa, charts} groups is
/// visible. `signals` covers the buy/sell tables; `full_table` and `analyst`
/// ride along with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub signals: bool,
    pub full_table: bool,
    pub analyst: bool,
    pub sepa: bool,
    pub charts: bool,
}

impl Visibility {
    pub fn for_view(view: ViewSelection) -> Self {
        let signals = view == ViewSelection::Signals;
        Self {
            signals,
            full_table: signals,
            analyst: signals,
            sepa: view == ViewSelection::Sepa,
            charts: view == ViewSelection::Charts,
        }
    }

    /// Legacy documents: signal sections always shown, nothing else exists.
    pub fn legacy() -> Self {
        Self {
            signals: true,
            full_table: true,
            analyst: false,
            sepa: false,
            charts: false,
        }
    }
}

/// One entry in the universe tab strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniverseTab {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// Everything a renderer needs for a populated dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub header: Header,
    pub counts: Counts,
    pub buys: Vec<SignalRecord>,
    pub sells: Vec<SignalRecord>,
    pub filtered_full: Vec<SignalRecord>,
    pub sepa_candidates: Vec<SepaRecord>,
    pub analyst_panel: Vec<AnalystRecord>,
    pub sepa_charts: Vec<ChartSeries>,
    pub visibility: Visibility,
    /// Universe tabs, empty for legacy documents.
    pub tabs: Vec<UniverseTab>,
    /// Active view, `None` for legacy documents.
    pub view: Option<ViewSelection>,
}

/// Output of reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderModel {
    /// Terminal state: nothing to render but a message.
    NoData { signal_name: String, message: String },
    Board(Box<Board>),
}

impl RenderModel {
    pub fn board(&self) -> Option<&Board> {
        match self {
            RenderModel::Board(board) => Some(board),
            RenderModel::NoData { .. } => None,
        }
    }
}

/// Resolve the selected universe, defaulting to the first in document order.
pub fn resolve_universe<'a>(
    dataset: &'a Dataset,
    selection: &UniverseSelection,
) -> Option<&'a Universe> {
    if let Some(id) = selection.id.as_deref() {
        if let Some(found) = dataset.universe(id) {
            return Some(found);
        }
        tracing::debug!(requested = id, "universe not found, falling back to first");
    }
    dataset.universes.first()
}

fn partition(records: &[SignalRecord], action: Action) -> Vec<SignalRecord> {
    records
        .iter()
        .filter(|r| r.action == action)
        .cloned()
        .collect()
}

/// Reconcile a dataset with the session into a render model.
pub fn reconcile(dataset: &Dataset, session: &Session) -> RenderModel {
    let Some(universe) = resolve_universe(dataset, &session.universe) else {
        return RenderModel::NoData {
            signal_name: dataset.signal_name.clone(),
            message: NO_UNIVERSES_MESSAGE.to_string(),
        };
    };
    let multi_view = dataset.capabilities.multi_view();

    let query = session.filter.normalized_query();
    let filtered_full = universe
        .records
        .iter()
        .filter(|r| session.filter.matches_normalized(&query, r))
        .cloned()
        .collect();

    let header = Header {
        as_of_date: dataset.as_of_date.clone(),
        fundamentals_as_of: dataset.fundamentals_as_of.clone(),
        universe_id: universe.id.clone(),
        universe_name: universe.name.clone(),
        signal_name: dataset.signal_name.clone(),
        show_universe: multi_view,
    };

    let counts = Counts {
        buy: universe.buy_count,
        sell: universe.sell_count,
        universe_size: universe.universe_size,
        sepa_count: universe.sepa_count.unwrap_or(0),
    };

    let (visibility, tabs, view) = if multi_view {
        let tabs = dataset
            .universes
            .iter()
            .map(|u| UniverseTab {
                id: u.id.clone(),
                name: u.name.clone(),
                active: u.id == universe.id,
            })
            .collect();
        (Visibility::for_view(session.view), tabs, Some(session.view))
    } else {
        (Visibility::legacy(), Vec::new(), None)
    };

    RenderModel::Board(Box::new(Board {
        header,
        counts,
        buys: partition(&universe.records, Action::Buy),
        sells: partition(&universe.records, Action::Sell),
        filtered_full,
        sepa_candidates: universe.sepa_candidates.clone().unwrap_or_default(),
        analyst_panel: universe.analyst_panel.clone().unwrap_or_default(),
        sepa_charts: universe.sepa_charts.clone().unwrap_or_default(),
        visibility,
        tabs,
        view,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;
    use crate::session::{ActionFilter, FilterState};

    fn dataset() -> Dataset {
        parse_document(
            br#"{"as_of_date":"2025-01-31","fundamentals_as_of":"2025-01-30","signal":"Composite",
                "universes":[
                  {"id":"top","name":"Top 50","records":[
                    {"ticker":"AAPL","rank":1,"composite_score":1.0,"action":"BUY"},
                    {"ticker":"MSFT","rank":2,"composite_score":0.5,"action":"HOLD"},
                    {"ticker":"GOOG","rank":3,"composite_score":0.1,"action":"SELL"}],
                   "sepa_count":2},
                  {"id":"bottom","name":"Bottom 100","records":[
                    {"ticker":"F","rank":1,"composite_score":0.2,"action":"BUY"}]}
                ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn unknown_universe_falls_back_to_first() {
        let ds = dataset();
        let session = Session {
            universe: UniverseSelection::new("nope"),
            ..Session::default()
        };
        let model = reconcile(&ds, &session);
        assert_eq!(model.board().unwrap().header.universe_id, "top");
    }

    #[test]
    fn selected_universe_drives_tabs_and_header() {
        let ds = dataset();
        let session = Session {
            universe: UniverseSelection::new("bottom"),
            ..Session::default()
        };
        let board = reconcile(&ds, &session).board().cloned().unwrap();
        assert_eq!(board.header.universe_name, "Bottom 100");
        assert_eq!(
            board.tabs.iter().map(|t| t.active).collect::<Vec<_>>(),
            [false, true]
        );
        assert_eq!(board.counts.sepa_count, 0);
    }

    #[test]
    fn header_line_includes_universe_and_fundamentals() {
        let board = reconcile(&dataset(), &Session::default())
            .board()
            .cloned()
            .unwrap();
        assert_eq!(
            board.header.as_of_line(),
            "As of 2025-01-31 | Top 50 | Fundamentals 2025-01-30"
        );
        assert_eq!(board.counts.sepa_count, 2);
    }

    #[test]
    fn exactly_one_view_group_visible() {
        let ds = dataset();
        for view in ViewSelection::ALL {
            let session = Session {
                view,
                ..Session::default()
            };
            let v = reconcile(&ds, &session).board().unwrap().visibility;
            let groups = [v.signals, v.sepa, v.charts];
            assert_eq!(groups.iter().filter(|g| **g).count(), 1, "{view:?}");
            assert_eq!(v.full_table, v.signals);
            assert_eq!(v.analyst, v.signals);
        }
    }

    #[test]
    fn action_filter_applies_to_full_table_only() {
        let ds = dataset();
        let session = Session {
            filter: FilterState::new("", ActionFilter::Only(Action::Hold)),
            ..Session::default()
        };
        let board = reconcile(&ds, &session).board().cloned().unwrap();
        assert_eq!(board.filtered_full.len(), 1);
        assert_eq!(board.filtered_full[0].ticker, "MSFT");
        assert_eq!(board.buys.len(), 1);
        assert_eq!(board.sells.len(), 1);
    }

    #[test]
    fn absent_sections_default_to_empty() {
        let board = reconcile(&dataset(), &Session::default())
            .board()
            .cloned()
            .unwrap();
        assert!(board.sepa_candidates.is_empty());
        assert!(board.sepa_charts.is_empty());
        assert!(board.analyst_panel.is_empty());
    }

    #[test]
    fn empty_universes_yield_no_data() {
        let ds = parse_document(br#"{"signal":"Composite","universes":[]}"#).unwrap();
        match reconcile(&ds, &Session::default()) {
            RenderModel::NoData {
                signal_name,
                message,
            } => {
                assert_eq!(signal_name, "Composite");
                assert_eq!(message, NO_UNIVERSES_MESSAGE);
            }
            other => panic!("expected NoData, got {other:?}"),
        }
    }
}
