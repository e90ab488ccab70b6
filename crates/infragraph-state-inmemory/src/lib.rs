//! In-memory diagram store for InfraGraph
//!
//! This crate provides an in-memory implementation of the
//! `DiagramRepository` interface defined in infragraph-core. It is primarily
//! useful for development, testing, and sessions where persistence is not
//! required.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use infragraph_core::{DiagramRecord, DiagramRepository};

pub mod repositories;
pub use repositories::InMemoryDiagramRepository;


/// Provider for in-memory diagram repositories
///
/// Every repository created by one provider shares the same storage, so two
/// editors built from the same provider see each other's saves.
pub struct InMemoryStateStoreProvider {
    diagrams: Arc<RwLock<HashMap<String, DiagramRecord>>>,
}

impl InMemoryStateStoreProvider {
    /// Create a new in-memory state store provider
    pub fn new() -> Self {
        Self {
            diagrams: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a repository backed by this provider's storage
    pub fn create_repository(&self) -> Arc<dyn DiagramRepository> {
        Arc::new(InMemoryDiagramRepository::new(self.diagrams.clone()))
    }

    /// Number of stored diagrams
    pub async fn diagram_count(&self) -> usize {
        self.diagrams.read().await.len()
    }
}

impl Default for InMemoryStateStoreProvider {
    fn default() -> Self {
        Self::new()
    }
}
