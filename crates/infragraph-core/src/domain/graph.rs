//! Infrastructure graph data model
//!
//! A graph is an ordered list of resource nodes, an ordered list of
//! relationship edges, and a metadata block. The JSON shape produced by
//! serde is the persisted diagram format:
//! `{ nodes, edges, metadata: { name, region, createdAt, updatedAt } }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Value object: Node ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Value object: Edge ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

/// Value object: Diagram ID, the key under which a graph is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagramId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Borrow the raw id
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(NodeId);
string_id!(EdgeId);
string_id!(DiagramId);

impl DiagramId {
    /// Generate a fresh random diagram id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Kind of infrastructure resource a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Virtual private cloud
    Vpc,
    /// Subnet inside a VPC
    Subnet,
    /// Compute instance
    Ec2,
    /// Managed relational database
    Rds,
    /// Object storage bucket
    S3,
    /// Serverless function
    Lambda,
    /// Application load balancer
    Alb,
    /// CDN distribution
    CloudFront,
    /// API gateway
    ApiGateway,
    /// Key-value table
    DynamoDb,
    /// Message queue
    Sqs,
    /// Notification topic
    Sns,
    /// Container service
    Ecs,
    /// Kubernetes cluster
    Eks,
    /// In-memory cache cluster
    ElastiCache,
    /// DNS zone
    Route53,
    /// Identity role or policy
    Iam,
    /// Security group
    SecurityGroup,
}

/// 2D canvas coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
}

impl Position {
    /// Create a position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A resource on the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Caller-assigned id
    pub id: NodeId,

    /// Resource kind
    #[serde(rename = "type")]
    pub kind: ResourceKind,

    /// Display label
    pub label: String,

    /// Canvas position
    #[serde(default)]
    pub position: Position,

    /// Resource-specific settings; never validated
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Node {
    /// Create a node at the origin with no properties
    pub fn new(id: impl Into<NodeId>, kind: ResourceKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            position: Position::default(),
            properties: Map::new(),
        }
    }

    /// Builder-style position setter
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Shallow merge: every field present in `changes` replaces the old one
    pub fn merge(&mut self, changes: &NodeUpdate) {
        if let Some(kind) = changes.kind {
            self.kind = kind;
        }
        if let Some(label) = &changes.label {
            self.label = label.clone();
        }
        if let Some(position) = changes.position {
            self.position = position;
        }
        if let Some(properties) = &changes.properties {
            self.properties = properties.clone();
        }
    }
}

/// Partial update for a node. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    /// New resource kind
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResourceKind>,

    /// New label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// New position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Replacement property map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

impl NodeUpdate {
    /// Update that only changes the label
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Update that only moves the node
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            position: Some(Position::new(x, y)),
            ..Self::default()
        }
    }
}

/// A relationship between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Caller-assigned id
    pub id: EdgeId,

    /// Source node id
    pub source: NodeId,

    /// Target node id
    pub target: NodeId,

    /// Relationship tag, e.g. "contains"
    #[serde(rename = "type")]
    pub relationship: String,
}

impl Edge {
    /// Create an edge
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
        }
    }

    /// True if either endpoint is `node`
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// Diagram metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    /// Diagram name
    pub name: String,

    /// Cloud region
    pub region: String,

    /// Creation timestamp; never changes once set
    pub created_at: DateTime<Utc>,

    /// Refreshed on every edit
    pub updated_at: DateTime<Utc>,
}

/// An infrastructure diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Resource nodes, in insertion order
    pub nodes: Vec<Node>,

    /// Relationship edges, in insertion order
    pub edges: Vec<Edge>,

    /// Metadata block
    pub metadata: GraphMetadata,
}

impl Graph {
    /// Create an empty graph stamped with `now`
    pub fn empty(name: impl Into<String>, region: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            metadata: GraphMetadata {
                name: name.into(),
                region: region.into(),
                created_at: now,
                updated_at: now,
            },
        }
    }

    /// Find a node by id
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// Find an edge by id
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| &edge.id == id)
    }

    /// Check whether a node exists
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Check whether an edge exists
    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge(id).is_some()
    }

    /// Edges with at least one endpoint missing from the node list.
    ///
    /// Referential integrity is not enforced on insertion, so this is the
    /// only place such edges surface.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        let ids: HashSet<&NodeId> = self.nodes.iter().map(|node| &node.id).collect();
        self.edges
            .iter()
            .filter(|edge| !ids.contains(&edge.source) || !ids.contains(&edge.target))
            .collect()
    }
}
