use chrono::{DateTime, Utc};
use serde::Serialize;

use super::diff::GraphDiff;
use super::graph::DiagramId;

/// Notification published by the editor after a state change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    /// An action changed the graph or moved the history cursor
    GraphChanged {
        /// Open diagram, if the graph is backed by one
        diagram_id: Option<DiagramId>,
        /// Action tag, e.g. "ADD_NODE"
        action: &'static str,
        /// What changed in the graph
        diff: GraphDiff,
        /// Cursor after the action
        history_index: usize,
        /// Snapshot count after the action
        history_len: usize,
        /// When the change was applied
        timestamp: DateTime<Utc>,
    },

    /// A diagram was loaded or created and became the editor's graph
    DiagramOpened {
        /// The opened diagram
        diagram_id: DiagramId,
        /// When it was opened
        timestamp: DateTime<Utc>,
    },

    /// The current graph was written to the store
    DiagramSaved {
        /// The saved diagram
        diagram_id: DiagramId,
        /// When it was saved
        timestamp: DateTime<Utc>,
    },

    /// The graph and its history were discarded
    DiagramClosed {
        /// The diagram that was open, if any
        diagram_id: Option<DiagramId>,
        /// When it was closed
        timestamp: DateTime<Utc>,
    },
}

impl EditorEvent {
    /// Returns the type of the event as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            EditorEvent::GraphChanged { .. } => "graph.changed",
            EditorEvent::DiagramOpened { .. } => "diagram.opened",
            EditorEvent::DiagramSaved { .. } => "diagram.saved",
            EditorEvent::DiagramClosed { .. } => "diagram.closed",
        }
    }

    /// Returns the timestamp when the event occurred
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            EditorEvent::GraphChanged { timestamp, .. }
            | EditorEvent::DiagramOpened { timestamp, .. }
            | EditorEvent::DiagramSaved { timestamp, .. }
            | EditorEvent::DiagramClosed { timestamp, .. } => *timestamp,
        }
    }
}
