//! Builders for graphs and action sequences.

use chrono::{DateTime, TimeZone, Utc};
use infragraph_core::{Edge, Graph, GraphAction, Node, ResourceKind};
use serde_json::Value;

/// Fixed timestamp so built graphs compare equal across runs
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Node with a label equal to its id
pub fn infra_node(id: &str, kind: ResourceKind) -> Node {
    Node::new(id, kind, id)
}

/// Fluent builder for [`Graph`] values
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    /// Start an empty graph
    pub fn new(name: &str) -> Self {
        Self {
            graph: Graph::empty(name, "us-east-1", fixed_time()),
        }
    }

    /// Set the region
    pub fn region(mut self, region: &str) -> Self {
        self.graph.metadata.region = region.to_string();
        self
    }

    /// Add a node whose label is its id
    pub fn node(mut self, id: &str, kind: ResourceKind) -> Self {
        self.graph.nodes.push(infra_node(id, kind));
        self
    }

    /// Add a node with one property
    pub fn node_with(mut self, id: &str, kind: ResourceKind, key: &str, value: Value) -> Self {
        self.graph
            .nodes
            .push(infra_node(id, kind).with_property(key, value));
        self
    }

    /// Add an edge
    pub fn edge(mut self, id: &str, source: &str, target: &str, relationship: &str) -> Self {
        self.graph
            .edges
            .push(Edge::new(id, source, target, relationship));
        self
    }

    /// Finish
    pub fn build(self) -> Graph {
        self.graph
    }
}

/// The n1/n2/e1 editing scenario as a list of actions
pub fn scenario_actions() -> Vec<GraphAction> {
    vec![
        GraphAction::AddNode(Node::new("n1", ResourceKind::Ec2, "A")),
        GraphAction::AddNode(Node::new("n2", ResourceKind::Rds, "B")),
        GraphAction::AddEdge(Edge::new("e1", "n1", "n2", "contains")),
    ]
}
