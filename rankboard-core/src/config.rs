//! TOML configuration: where the document lives and the initial session.
//!
//! Lookup order: an explicit `--config` path (must exist), then
//! `<config_dir>/rankboard/config.toml` (optional), then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{ActionFilter, FilterState, Session, UniverseSelection, ViewSelection};
use crate::source::{SourceSpec, ValidationPolicy, DEFAULT_DATA_PATH};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("source.path and source.url are mutually exclusive")]
    ConflictingSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    pub timeout_secs: u64,
    pub strict: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: None,
            timeout_secs: 30,
            strict: false,
        }
    }
}

impl SourceConfig {
    pub fn spec(&self) -> Result<SourceSpec, ConfigError> {
        match (&self.path, &self.url) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingSource),
            (Some(path), None) => Ok(SourceSpec::File(path.clone())),
            (None, Some(url)) => Ok(SourceSpec::Url(url.clone())),
            (None, None) => Ok(SourceSpec::File(PathBuf::from(DEFAULT_DATA_PATH))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy::from_strict(self.strict)
    }
}

/// Initial session values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub universe: Option<String>,
    pub view: ViewSelection,
    pub action: ActionFilter,
    pub query: String,
}

impl SessionConfig {
    pub fn to_session(&self) -> Session {
        Session {
            filter: FilterState::new(self.query.clone(), self.action),
            universe: UniverseSelection {
                id: self.universe.clone(),
            },
            view: self.view,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub session: SessionConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `<config_dir>/rankboard/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rankboard").join("config.toml"))
    }

    /// Load config from an explicit path, or the default path if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Action;

    #[test]
    fn empty_config_uses_defaults() {
        let c = Config::from_toml("").unwrap();
        assert_eq!(c, Config::default());
        assert_eq!(c.source.spec().unwrap(), SourceSpec::default());
        assert_eq!(c.source.timeout(), Duration::from_secs(30));
        assert_eq!(c.source.policy(), ValidationPolicy::Lenient);
    }

    #[test]
    fn full_config() {
        let c = Config::from_toml(
            r#"
            [source]
            url = "https://example.com/data/top50_signals.json"
            timeout_secs = 5
            strict = true

            [session]
            universe = "sp500_bottom100"
            view = "charts"
            action = "SELL"
            query = "nv"
            "#,
        )
        .unwrap();
        assert!(matches!(c.source.spec().unwrap(), SourceSpec::Url(_)));
        assert_eq!(c.source.policy(), ValidationPolicy::Strict);

        let session = c.session.to_session();
        assert_eq!(session.view, ViewSelection::Charts);
        assert_eq!(session.filter.action, ActionFilter::Only(Action::Sell));
        assert_eq!(session.universe.id.as_deref(), Some("sp500_bottom100"));
        assert_eq!(session.filter.query, "nv");
    }

    #[test]
    fn path_and_url_conflict() {
        let c = Config::from_toml(
            r#"
            [source]
            path = "a.json"
            url = "https://example.com/a.json"
            "#,
        )
        .unwrap();
        assert!(matches!(c.source.spec(), Err(ConfigError::ConflictingSource)));
    }

    #[test]
    fn bad_view_is_a_parse_error() {
        let err = Config::from_toml("[session]\nview = \"tables\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn view_and_action_accept_any_case() {
        let c = Config::from_toml("[session]\nview = \"SEPA\"\naction = \"sell\"\n").unwrap();
        let session = c.session.to_session();
        assert_eq!(session.view, ViewSelection::Sepa);
        assert_eq!(session.filter.action.to_string(), "SELL");
        assert!(toml::to_string(&c.session).unwrap().contains("view = \"sepa\""));
    }

    #[test]
    fn explicit_missing_file_errors() {
        let err = Config::load(Some(Path::new("/nonexistent/rankboard.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rankboard.toml");
        std::fs::write(&path, "[source]\npath = \"elsewhere.json\"\n").unwrap();
        let c = Config::load(Some(&path)).unwrap();
        assert_eq!(
            c.source.spec().unwrap(),
            SourceSpec::File(PathBuf::from("elsewhere.json"))
        );
    }
}
