use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::debug;

use infragraph_core::{
    CoreError, DiagramId, DiagramRecord, DiagramRepository, DiagramSummary, Graph,
};
use infragraph_monitoring::StoreMetrics;

const STORE_NAME: &str = "memory";

/// In-memory implementation of the DiagramRepository
pub struct InMemoryDiagramRepository {
    diagrams: Arc<RwLock<HashMap<String, DiagramRecord>>>,
}

impl InMemoryDiagramRepository {
    /// Create a repository over shared storage
    pub fn new(diagrams: Arc<RwLock<HashMap<String, DiagramRecord>>>) -> Self {
        Self { diagrams }
    }

    /// Create a repository with its own empty storage
    pub fn standalone() -> Self {
        Self::new(Arc::new(RwLock::new(HashMap::new())))
    }
}

impl Default for InMemoryDiagramRepository {
    fn default() -> Self {
        Self::standalone()
    }
}

fn record_metric(operation: &str, diagram_id: &str, started: Instant, success: bool) {
    StoreMetrics::record_operation(
        STORE_NAME,
        operation,
        diagram_id,
        started.elapsed().as_secs_f64() * 1000.0,
        success,
    );
}

#[async_trait]
impl DiagramRepository for InMemoryDiagramRepository {
    async fn load(&self, id: &DiagramId) -> Result<Option<DiagramRecord>, CoreError> {
        let started = Instant::now();
        let record = self.diagrams.read().await.get(&id.0).cloned();
        record_metric("load", id.as_str(), started, true);
        Ok(record)
    }

    async fn save(&self, id: &DiagramId, graph: &Graph) -> Result<(), CoreError> {
        let started = Instant::now();
        let result = {
            let mut diagrams = self.diagrams.write().await;
            match diagrams.get_mut(&id.0) {
                Some(record) => {
                    record.graph = graph.clone();
                    record.updated_at = Utc::now();
                    Ok(())
                }
                None => Err(CoreError::DiagramNotFound(id.0.clone())),
            }
        };

        record_metric("save", id.as_str(), started, result.is_ok());
        result
    }

    async fn create(
        &self,
        name: &str,
        description: Option<String>,
        region: &str,
    ) -> Result<DiagramId, CoreError> {
        let started = Instant::now();
        let id = DiagramId::generate();
        let record = DiagramRecord::new(id.clone(), name, description, region);

        self.diagrams.write().await.insert(id.0.clone(), record);
        debug!(diagram_id = %id, name, "Diagram created");
        record_metric("create", id.as_str(), started, true);
        Ok(id)
    }

    async fn delete(&self, id: &DiagramId) -> Result<(), CoreError> {
        let started = Instant::now();
        let removed = self.diagrams.write().await.remove(&id.0);
        let result = match removed {
            Some(_) => {
                debug!(diagram_id = %id, "Diagram deleted");
                Ok(())
            }
            None => Err(CoreError::DiagramNotFound(id.0.clone())),
        };

        record_metric("delete", id.as_str(), started, result.is_ok());
        result
    }

    async fn list(&self) -> Result<Vec<DiagramSummary>, CoreError> {
        let started = Instant::now();
        let mut summaries: Vec<DiagramSummary> = self
            .diagrams
            .read()
            .await
            .values()
            .map(DiagramRecord::summary)
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        record_metric("list", "*", started, true);
        Ok(summaries)
    }
}
