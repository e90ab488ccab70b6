//! Operational measurements recorded through tracing.

use tracing::{debug, info, warn};

/// Diagram editor measurements
pub struct EditorMetrics;

impl EditorMetrics {
    /// Record an applied history action
    pub fn record_action(action: &str, changed: bool, history_index: usize, history_len: usize) {
        debug!(
            action,
            changed, history_index, history_len, "History action applied"
        );
    }

    /// Record an action rejected by validation
    pub fn record_rejected_action(action: &str, reason: &str) {
        warn!(action, reason, "History action rejected");
    }

    /// Record the oldest snapshots being evicted to respect the history cap
    pub fn record_eviction(evicted: usize, capacity: usize) {
        debug!(evicted, capacity, "History snapshots evicted");
    }
}

/// Diagram store measurements
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a store round trip
    pub fn record_operation(
        store: &str,
        operation: &str,
        diagram_id: &str,
        duration_ms: f64,
        success: bool,
    ) {
        if success {
            info!(
                store,
                operation, diagram_id, duration_ms, "Diagram store operation"
            );
        } else {
            warn!(
                store,
                operation, diagram_id, duration_ms, "Diagram store operation failed"
            );
        }
    }
}
