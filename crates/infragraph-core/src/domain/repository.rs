//! Repository traits for diagram persistence
//!
//! The editor talks to the remote diagram store only through
//! [`DiagramRepository`]. External crates implement it to provide different
//! persistence mechanisms.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::graph::{DiagramId, Graph};
use crate::CoreError;

/// A stored diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRecord {
    /// Store key
    pub id: DiagramId,

    /// Human-readable name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// The saved graph
    pub graph: Graph,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last save timestamp
    pub updated_at: DateTime<Utc>,
}

impl DiagramRecord {
    /// Create a record holding an empty graph
    pub fn new(
        id: DiagramId,
        name: impl Into<String>,
        description: Option<String>,
        region: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let name = name.into();
        Self {
            id,
            graph: Graph::empty(name.clone(), region, now),
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Listing view of this record
    pub fn summary(&self) -> DiagramSummary {
        DiagramSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            node_count: self.graph.nodes.len(),
            edge_count: self.graph.edges.len(),
            updated_at: self.updated_at,
        }
    }
}

/// Listing view of a stored diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramSummary {
    /// Store key
    pub id: DiagramId,
    /// Human-readable name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Number of nodes in the saved graph
    pub node_count: usize,
    /// Number of edges in the saved graph
    pub edge_count: usize,
    /// Last save timestamp
    pub updated_at: DateTime<Utc>,
}

/// Repository for diagrams
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagramRepository: Send + Sync {
    /// Load a diagram by ID; `None` when it does not exist
    async fn load(&self, id: &DiagramId) -> Result<Option<DiagramRecord>, CoreError>;

    /// Replace the graph of an existing diagram
    async fn save(&self, id: &DiagramId, graph: &Graph) -> Result<(), CoreError>;

    /// Create a diagram holding an empty graph and return its id
    async fn create(
        &self,
        name: &str,
        description: Option<String>,
        region: &str,
    ) -> Result<DiagramId, CoreError>;

    /// Delete a diagram
    async fn delete(&self, id: &DiagramId) -> Result<(), CoreError>;

    /// List stored diagrams, sorted by name
    async fn list(&self) -> Result<Vec<DiagramSummary>, CoreError>;
}
