//! RankBoard Core: dataset model, loading, session state and reconciliation.
//!
//! This crate contains everything a renderer needs and nothing that draws:
//! - Domain types for ranked signal records, SEPA candidates, analyst panels
//!   and chart series
//! - Document parsing for both the multi-universe and the legacy single-universe
//!   shapes, with score fallbacks resolved once at load time
//! - Data sources (embedded bytes, local file, HTTP) and their error taxonomy
//! - Dataset validation (rank contiguity, chart array lengths, counts)
//! - The explicit session object (filter, universe selection, view selection)
//! - The pure reconciler that turns `(Dataset, Session)` into a `RenderModel`
//! - The shared placeholder formatting contract for nullable numbers

pub mod config;
pub mod document;
pub mod format;
pub mod model;
pub mod reconcile;
pub mod session;
pub mod source;
pub mod validate;

pub use config::{Config, ConfigError, SessionConfig, SourceConfig};
pub use document::{digest, parse_document};
pub use model::{
    Action, AnalystRecord, Capabilities, ChartSeries, Dataset, SepaRecord, SignalRecord, Universe,
};
pub use reconcile::{reconcile, Board, Counts, Header, RenderModel, UniverseTab, Visibility};
pub use session::{ActionFilter, FilterState, Session, UniverseSelection, ViewSelection};
pub use source::{
    DataSource, EmbeddedSource, FileSource, HttpSource, LoadError, SourceSpec, ValidationPolicy,
    DEFAULT_DATA_PATH,
};
pub use validate::DatasetIssue;

#[cfg(test)]
mod tests {
    use super::*;

    /// The TUI hands a boxed source to its loader thread and gets a dataset
    /// back over a channel, so both must cross threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Dataset>();
        require_sync::<Dataset>();
        require_send::<RenderModel>();
        require_sync::<RenderModel>();
        require_send::<Session>();
        require_send::<LoadError>();
        require_send::<Box<dyn DataSource>>();
    }
}
