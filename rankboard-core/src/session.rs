//! Session state: the three user-controlled inputs to reconciliation.
//!
//! Each holder is a plain value mutated by discrete user events (text input,
//! universe change, view change). Nothing here validates against the dataset:
//! an unknown universe id is resolved by the reconciler, not rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Action, SignalRecord};

/// Action-category filter for the full table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActionFilter {
    #[default]
    All,
    Only(Action),
}

impl ActionFilter {
    pub fn accepts(self, action: Action) -> bool {
        match self {
            ActionFilter::All => true,
            ActionFilter::Only(wanted) => wanted == action,
        }
    }

    /// Cycle ALL → BUY → SELL → HOLD → ALL.
    pub fn next(self) -> Self {
        match self {
            ActionFilter::All => ActionFilter::Only(Action::Buy),
            ActionFilter::Only(Action::Buy) => ActionFilter::Only(Action::Sell),
            ActionFilter::Only(Action::Sell) => ActionFilter::Only(Action::Hold),
            ActionFilter::Only(Action::Hold) => ActionFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionFilter::All => "ALL",
            ActionFilter::Only(action) => action.label(),
        }
    }
}

impl fmt::Display for ActionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "ALL" => Ok(ActionFilter::All),
            "BUY" => Ok(ActionFilter::Only(Action::Buy)),
            "SELL" => Ok(ActionFilter::Only(Action::Sell)),
            "HOLD" => Ok(ActionFilter::Only(Action::Hold)),
            other => Err(format!(
                "unknown action filter '{other}' (expected ALL, BUY, SELL or HOLD)"
            )),
        }
    }
}

impl TryFrom<String> for ActionFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActionFilter> for String {
    fn from(filter: ActionFilter) -> Self {
        filter.label().to_string()
    }
}

/// Free-text ticker query plus action filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub action: ActionFilter,
}

impl FilterState {
    pub fn new(query: impl Into<String>, action: ActionFilter) -> Self {
        Self {
            query: query.into(),
            action,
        }
    }

    /// The query as matched: trimmed and uppercased.
    pub fn normalized_query(&self) -> String {
        self.query.trim().to_uppercase()
    }

    /// Whether a record passes both the ticker query and the action filter.
    /// An empty query matches every ticker.
    pub fn matches(&self, record: &SignalRecord) -> bool {
        self.matches_normalized(&self.normalized_query(), record)
    }

    pub(crate) fn matches_normalized(&self, query: &str, record: &SignalRecord) -> bool {
        self.action.accepts(record.action) && record.ticker.to_uppercase().contains(query)
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }
}

/// Which universe is active. `None` means "the first one in the document".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniverseSelection {
    pub id: Option<String>,
}

impl UniverseSelection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }
}

/// Which display mode is active. Only meaningful for multi-universe documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ViewSelection {
    #[default]
    Signals,
    Sepa,
    Charts,
}

impl ViewSelection {
    pub const ALL: [ViewSelection; 3] =
        [ViewSelection::Signals, ViewSelection::Sepa, ViewSelection::Charts];

    pub fn id(self) -> &'static str {
        match self {
            ViewSelection::Signals => "signals",
            ViewSelection::Sepa => "sepa",
            ViewSelection::Charts => "charts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewSelection::Signals => "Signals",
            ViewSelection::Sepa => "SEPA",
            ViewSelection::Charts => "Charts",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ViewSelection::Signals => 0,
            ViewSelection::Sepa => 1,
            ViewSelection::Charts => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for ViewSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signals" => Ok(ViewSelection::Signals),
            "sepa" => Ok(ViewSelection::Sepa),
            "charts" => Ok(ViewSelection::Charts),
            other => Err(format!(
                "unknown view '{other}' (expected signals, sepa or charts)"
            )),
        }
    }
}

impl TryFrom<String> for ViewSelection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewSelection> for String {
    fn from(view: ViewSelection) -> Self {
        view.id().to_string()
    }
}

/// Everything the user controls, owned by one page/terminal session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub filter: FilterState,
    pub universe: UniverseSelection,
    pub view: ViewSelection,
}
