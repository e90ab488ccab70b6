//! Testing utilities for InfraGraph.
//!
//! Graph builders, history assertions, log capture and diagram store
//! wrappers for fault injection, shared by the workspace test suites.

pub mod assertions;
pub mod builders;
pub mod implementations;
pub mod logs;

pub use assertions::{
    assert_edge_ids, assert_history_invariants, assert_node_ids, GraphAssertionError,
};
pub use builders::{infra_node, scenario_actions, GraphBuilder};
pub use implementations::{FlakyDiagramRepository, GatedDiagramRepository};
pub use logs::{capture_logs, CapturedLogs};

pub use infragraph_monitoring::logging::init_test_tracing;
