//! Bounded undo/redo history for a graph
//!
//! `HistoryState` is a reducer: every edit goes through [`HistoryState::apply`],
//! which produces the next graph, records it as a snapshot, and moves the
//! cursor. Snapshots after the cursor are dropped on every new edit, so redo
//! is only possible until the next edit. The oldest snapshots are evicted
//! once the buffer exceeds its capacity.
//!
//! Invariants held after every call:
//! - `history_index < history.len()` whenever the history is non-empty
//! - `graph == history[history_index]`
//! - `history.len() <= capacity`

use chrono::{DateTime, Utc};
use infragraph_monitoring::EditorMetrics;
use serde::{Deserialize, Serialize};

use super::graph::{Edge, EdgeId, Graph, Node, NodeId, NodeUpdate};
use crate::CoreError;

/// Default number of snapshots kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Name given to graphs synthesized by the first node insertion
pub const DEFAULT_GRAPH_NAME: &str = "New Infrastructure";

/// Region given to synthesized graphs
pub const DEFAULT_REGION: &str = "us-east-1";

/// How strictly edits are checked against the current graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Tolerate duplicate ids and dangling edges; unknown ids are no-ops
    #[default]
    Lenient,
    /// Reject duplicate ids, unknown ids and dangling edge endpoints
    Strict,
}

/// Parameters of a history buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLimits {
    capacity: usize,
    validation: ValidationMode,
    default_name: String,
    default_region: String,
}

impl HistoryLimits {
    /// Create limits; a zero capacity is raised to one
    pub fn new(capacity: usize, validation: ValidationMode) -> Self {
        Self {
            capacity: capacity.max(1),
            validation,
            default_name: DEFAULT_GRAPH_NAME.to_string(),
            default_region: DEFAULT_REGION.to_string(),
        }
    }

    /// Override the metadata used for synthesized graphs
    pub fn with_defaults(mut self, name: impl Into<String>, region: impl Into<String>) -> Self {
        self.default_name = name.into();
        self.default_region = region.into();
        self
    }

    /// Maximum number of snapshots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Validation mode
    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// Name for synthesized graphs
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Region for synthesized graphs
    pub fn default_region(&self) -> &str {
        &self.default_region
    }
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY, ValidationMode::default())
    }
}

/// An edit or navigation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphAction {
    /// Replace the whole graph
    SetGraph(Graph),
    /// Append a node
    AddNode(Node),
    /// Shallow-merge changes into a node
    UpdateNode {
        /// Node to update
        id: NodeId,
        /// Fields to replace
        changes: NodeUpdate,
    },
    /// Remove a node and every edge touching it
    RemoveNode(NodeId),
    /// Append an edge
    AddEdge(Edge),
    /// Remove an edge
    RemoveEdge(EdgeId),
    /// Step back one snapshot
    Undo,
    /// Step forward one snapshot
    Redo,
    /// Drop the graph and its history
    Clear,
}

impl GraphAction {
    /// Stable tag, matching the serialized `type`
    pub fn name(&self) -> &'static str {
        match self {
            GraphAction::SetGraph(_) => "SET_GRAPH",
            GraphAction::AddNode(_) => "ADD_NODE",
            GraphAction::UpdateNode { .. } => "UPDATE_NODE",
            GraphAction::RemoveNode(_) => "REMOVE_NODE",
            GraphAction::AddEdge(_) => "ADD_EDGE",
            GraphAction::RemoveEdge(_) => "REMOVE_EDGE",
            GraphAction::Undo => "UNDO",
            GraphAction::Redo => "REDO",
            GraphAction::Clear => "CLEAR",
        }
    }
}

/// Outcome of applying an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Graph, history or cursor changed
    Changed,
    /// Nothing changed
    Unchanged,
}

impl Transition {
    /// True for [`Transition::Changed`]
    pub fn is_changed(self) -> bool {
        matches!(self, Transition::Changed)
    }
}

/// Current graph plus its bounded undo/redo trail
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    graph: Option<Graph>,
    history: Vec<Graph>,
    history_index: usize,
    limits: HistoryLimits,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new(HistoryLimits::default())
    }
}

impl HistoryState {
    /// Create an empty state with no graph
    pub fn new(limits: HistoryLimits) -> Self {
        Self {
            graph: None,
            history: Vec::new(),
            history_index: 0,
            limits,
        }
    }

    /// Create a state whose single baseline snapshot is `graph`
    pub fn with_graph(limits: HistoryLimits, graph: Graph) -> Self {
        Self {
            graph: Some(graph.clone()),
            history: vec![graph],
            history_index: 0,
            limits,
        }
    }

    /// The current graph
    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    /// All retained snapshots, oldest first
    pub fn history(&self) -> &[Graph] {
        &self.history
    }

    /// Cursor into [`HistoryState::history`]
    pub fn history_index(&self) -> usize {
        self.history_index
    }

    /// Number of retained snapshots
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True when no snapshot is retained
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Limits this state was created with
    pub fn limits(&self) -> &HistoryLimits {
        &self.limits
    }

    /// Whether [`GraphAction::Undo`] would move the cursor
    pub fn can_undo(&self) -> bool {
        self.history_index > 0
    }

    /// Whether [`GraphAction::Redo`] would move the cursor
    pub fn can_redo(&self) -> bool {
        !self.history.is_empty() && self.history_index < self.history.len() - 1
    }

    /// Apply an action, stamping edits with the current time
    pub fn apply(&mut self, action: GraphAction) -> Result<Transition, CoreError> {
        self.apply_at(action, Utc::now())
    }

    /// Apply an action, stamping edits with `now`.
    ///
    /// On error the state is left exactly as it was.
    pub fn apply_at(
        &mut self,
        action: GraphAction,
        now: DateTime<Utc>,
    ) -> Result<Transition, CoreError> {
        let name = action.name();
        let result = self.reduce(action, now);

        match &result {
            Ok(transition) => EditorMetrics::record_action(
                name,
                transition.is_changed(),
                self.history_index,
                self.history.len(),
            ),
            Err(e) => EditorMetrics::record_rejected_action(name, &e.to_string()),
        }

        result
    }

    fn reduce(&mut self, action: GraphAction, now: DateTime<Utc>) -> Result<Transition, CoreError> {
        match action {
            GraphAction::SetGraph(graph) => {
                self.push_snapshot(graph);
                Ok(Transition::Changed)
            }
            GraphAction::AddNode(node) => self.add_node(node, now),
            GraphAction::UpdateNode { id, changes } => self.update_node(&id, &changes, now),
            GraphAction::RemoveNode(id) => self.remove_node(&id, now),
            GraphAction::AddEdge(edge) => self.add_edge(edge, now),
            GraphAction::RemoveEdge(id) => self.remove_edge(&id, now),
            GraphAction::Undo => Ok(self.undo()),
            GraphAction::Redo => Ok(self.redo()),
            GraphAction::Clear => Ok(self.clear()),
        }
    }

    fn strict(&self) -> bool {
        self.limits.validation == ValidationMode::Strict
    }

    /// Unknown target: an error in strict mode, a no-op otherwise
    fn missing(&self, error: CoreError) -> Result<Transition, CoreError> {
        if self.strict() {
            Err(error)
        } else {
            Ok(Transition::Unchanged)
        }
    }

    fn add_node(&mut self, node: Node, now: DateTime<Utc>) -> Result<Transition, CoreError> {
        let Some(current) = &self.graph else {
            let mut graph = Graph::empty(
                self.limits.default_name(),
                self.limits.default_region(),
                now,
            );
            graph.nodes.push(node);
            self.graph = Some(graph.clone());
            self.history = vec![graph];
            self.history_index = 0;
            return Ok(Transition::Changed);
        };

        if self.strict() && current.contains_node(&node.id) {
            return Err(CoreError::DuplicateNodeId(node.id.0));
        }

        let mut next = current.clone();
        next.nodes.push(node);
        next.metadata.updated_at = now;
        self.push_snapshot(next);
        Ok(Transition::Changed)
    }

    fn update_node(
        &mut self,
        id: &NodeId,
        changes: &NodeUpdate,
        now: DateTime<Utc>,
    ) -> Result<Transition, CoreError> {
        let position = self
            .graph
            .as_ref()
            .and_then(|graph| graph.nodes.iter().position(|node| &node.id == id));
        let (Some(current), Some(position)) = (&self.graph, position) else {
            return self.missing(CoreError::NodeNotFound(id.0.clone()));
        };

        let mut next = current.clone();
        next.nodes[position].merge(changes);
        next.metadata.updated_at = now;
        self.push_snapshot(next);
        Ok(Transition::Changed)
    }

    fn remove_node(&mut self, id: &NodeId, now: DateTime<Utc>) -> Result<Transition, CoreError> {
        let Some(current) = self.graph.as_ref().filter(|graph| graph.contains_node(id)) else {
            return self.missing(CoreError::NodeNotFound(id.0.clone()));
        };

        let mut next = current.clone();
        next.nodes.retain(|node| &node.id != id);
        next.edges.retain(|edge| !edge.touches(id));
        next.metadata.updated_at = now;
        self.push_snapshot(next);
        Ok(Transition::Changed)
    }

    fn add_edge(&mut self, edge: Edge, now: DateTime<Utc>) -> Result<Transition, CoreError> {
        let Some(current) = &self.graph else {
            return self.missing(CoreError::InvalidEdgeEndpoint {
                edge: edge.id.0,
                endpoint: edge.source.0,
            });
        };

        if self.strict() {
            if current.contains_edge(&edge.id) {
                return Err(CoreError::DuplicateEdgeId(edge.id.0));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !current.contains_node(endpoint) {
                    return Err(CoreError::InvalidEdgeEndpoint {
                        edge: edge.id.0.clone(),
                        endpoint: endpoint.0.clone(),
                    });
                }
            }
        }

        let mut next = current.clone();
        next.edges.push(edge);
        next.metadata.updated_at = now;
        self.push_snapshot(next);
        Ok(Transition::Changed)
    }

    fn remove_edge(&mut self, id: &EdgeId, now: DateTime<Utc>) -> Result<Transition, CoreError> {
        let Some(current) = self.graph.as_ref().filter(|graph| graph.contains_edge(id)) else {
            return self.missing(CoreError::EdgeNotFound(id.0.clone()));
        };

        let mut next = current.clone();
        next.edges.retain(|edge| &edge.id != id);
        next.metadata.updated_at = now;
        self.push_snapshot(next);
        Ok(Transition::Changed)
    }

    fn undo(&mut self) -> Transition {
        if !self.can_undo() {
            return Transition::Unchanged;
        }
        self.history_index -= 1;
        self.graph = Some(self.history[self.history_index].clone());
        Transition::Changed
    }

    fn redo(&mut self) -> Transition {
        if !self.can_redo() {
            return Transition::Unchanged;
        }
        self.history_index += 1;
        self.graph = Some(self.history[self.history_index].clone());
        Transition::Changed
    }

    fn clear(&mut self) -> Transition {
        if self.graph.is_none() && self.history.is_empty() {
            return Transition::Unchanged;
        }
        self.graph = None;
        self.history.clear();
        self.history_index = 0;
        Transition::Changed
    }

    /// Truncate the redo tail, append, then evict from the front to fit
    fn push_snapshot(&mut self, graph: Graph) {
        let keep = if self.history.is_empty() {
            0
        } else {
            self.history_index + 1
        };
        self.history.truncate(keep);
        self.history.push(graph.clone());
        self.graph = Some(graph);

        let overflow = self.history.len().saturating_sub(self.limits.capacity);
        if overflow > 0 {
            self.history.drain(..overflow);
            EditorMetrics::record_eviction(overflow, self.limits.capacity);
        }
        self.history_index = self.history.len() - 1;
    }
}
