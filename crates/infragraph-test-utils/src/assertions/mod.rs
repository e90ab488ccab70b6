//! Assertion utilities for graphs and history buffers.

use infragraph_core::{Graph, HistoryState};
use thiserror::Error;

/// Error type for graph and history validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphAssertionError {
    #[error("Node ids mismatch: expected {expected:?}, got {actual:?}")]
    NodeIds {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Edge ids mismatch: expected {expected:?}, got {actual:?}")]
    EdgeIds {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("History cursor {index} out of range for {len} snapshots")]
    CursorOutOfRange { index: usize, len: usize },

    #[error("Current graph differs from the snapshot under the cursor")]
    GraphNotAtCursor,

    #[error("History holds {len} snapshots, above capacity {capacity}")]
    OverCapacity { len: usize, capacity: usize },
}

/// Asserts that a graph holds exactly the given node ids, in order.
pub fn assert_node_ids(graph: &Graph, expected: &[&str]) -> Result<(), GraphAssertionError> {
    let actual: Vec<String> = graph.nodes.iter().map(|n| n.id.0.clone()).collect();
    if actual != expected {
        return Err(GraphAssertionError::NodeIds {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            actual,
        });
    }
    Ok(())
}

/// Asserts that a graph holds exactly the given edge ids, in order.
pub fn assert_edge_ids(graph: &Graph, expected: &[&str]) -> Result<(), GraphAssertionError> {
    let actual: Vec<String> = graph.edges.iter().map(|e| e.id.0.clone()).collect();
    if actual != expected {
        return Err(GraphAssertionError::EdgeIds {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            actual,
        });
    }
    Ok(())
}

/// Checks the cursor, graph-at-cursor and capacity invariants of a history.
pub fn assert_history_invariants(state: &HistoryState) -> Result<(), GraphAssertionError> {
    let len = state.len();
    let capacity = state.limits().capacity();
    if len > capacity {
        return Err(GraphAssertionError::OverCapacity { len, capacity });
    }
    if len == 0 {
        return match state.graph() {
            None => Ok(()),
            Some(_) => Err(GraphAssertionError::GraphNotAtCursor),
        };
    }

    let index = state.history_index();
    if index >= len {
        return Err(GraphAssertionError::CursorOutOfRange { index, len });
    }
    if state.graph() != Some(&state.history()[index]) {
        return Err(GraphAssertionError::GraphNotAtCursor);
    }
    Ok(())
}
