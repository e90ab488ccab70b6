//! Editor configuration
//!
//! Values come from an optional file (any format the `config` crate
//! recognises by extension) overridden by `INFRAGRAPH_*` environment
//! variables. Nested keys use a double underscore, e.g.
//! `INFRAGRAPH_STORE__BACKEND=file`.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::history::{
    HistoryLimits, ValidationMode, DEFAULT_GRAPH_NAME, DEFAULT_HISTORY_CAPACITY, DEFAULT_REGION,
};
use crate::CoreError;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "INFRAGRAPH";

/// Diagram editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum number of history snapshots
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Name of graphs synthesized by the first node insertion
    #[serde(default = "default_name")]
    pub default_name: String,

    /// Region of new graphs
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Edit validation mode
    #[serde(default)]
    pub validation: ValidationMode,

    /// Capacity of the change notification channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Diagram store backend
    #[serde(default)]
    pub store: StoreConfig,
}

/// Which diagram store to use
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Process-local store, lost on exit
    #[default]
    Memory,
    /// One JSON file per diagram under `root`
    File {
        /// Directory holding the diagram files
        root: PathBuf,
    },
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_name() -> String {
    DEFAULT_GRAPH_NAME.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_event_buffer() -> usize {
    64
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            default_name: default_name(),
            default_region: default_region(),
            validation: ValidationMode::default(),
            event_buffer: default_event_buffer(),
            store: StoreConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from an optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        Self::load_with_environment(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub(crate) fn load_with_environment(
        path: Option<&Path>,
        environment: Environment,
    ) -> Result<Self, CoreError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: EditorConfig = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;

        info!(
            history_limit = config.history_limit,
            validation = ?config.validation,
            store = ?config.store,
            "Editor configuration loaded"
        );

        Ok(config)
    }

    /// Reject values the editor cannot work with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.history_limit == 0 {
            return Err(CoreError::ConfigurationError(
                "history_limit must be at least 1".to_string(),
            ));
        }
        if self.event_buffer == 0 {
            return Err(CoreError::ConfigurationError(
                "event_buffer must be at least 1".to_string(),
            ));
        }
        if self.default_region.trim().is_empty() {
            return Err(CoreError::ConfigurationError(
                "default_region must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// History parameters derived from this configuration
    pub fn history_limits(&self) -> HistoryLimits {
        HistoryLimits::new(self.history_limit, self.validation)
            .with_defaults(self.default_name.clone(), self.default_region.clone())
    }
}
