//! Monitoring module for the InfraGraph diagram editor.
//!
//! Provides logging initialisation and a small set of tracing-based
//! measurement helpers used by the editor and the diagram stores.

use serde::{Deserialize, Serialize};
use tracing::info;

pub mod logging;
pub mod metrics;

/// Configuration for initializing the monitoring system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Service name attached to the startup log line
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Log level filter (e.g., "info,infragraph_core=debug")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Emit JSON instead of pretty output on stdout
    #[serde(default)]
    pub enable_json_logging: bool,
    /// Optional file that receives a daily-rotated JSON copy of the logs
    #[serde(default)]
    pub log_file: Option<String>,
    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_service_name() -> String {
    "infragraph".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_filter: default_log_filter(),
            enable_json_logging: false,
            log_file: None,
            environment: default_environment(),
        }
    }
}

/// Initialize monitoring system
pub fn init(config: MonitoringConfig) -> anyhow::Result<()> {
    logging::init_logging(&config)?;

    info!(
        service_name = %config.service_name,
        environment = %config.environment,
        "Monitoring initialized"
    );

    Ok(())
}


// Exported types
pub use crate::logging::{init_logging, LogExt};
pub use crate::metrics::{EditorMetrics, StoreMetrics};
