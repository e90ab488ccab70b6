use async_trait::async_trait;
use infragraph_core::{
    CoreError, DiagramId, DiagramRecord, DiagramRepository, DiagramSummary, Graph,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

/// Wraps a diagram store and parks one operation until released.
///
/// Lets a test interleave editor calls at a known point inside another call.
pub struct GatedDiagramRepository {
    inner: Arc<dyn DiagramRepository>,
    held: Mutex<Option<&'static str>>,
    parked: Notify,
    release: Semaphore,
}

impl GatedDiagramRepository {
    /// Wrap `inner`; nothing is held until told to
    pub fn new(inner: Arc<dyn DiagramRepository>) -> Self {
        Self {
            inner,
            held: Mutex::new(None),
            parked: Notify::new(),
            release: Semaphore::new(0),
        }
    }

    /// Park the next call to `operation` ("load", "save", "create", "delete", "list")
    pub fn hold(&self, operation: &'static str) {
        *self.held.lock() = Some(operation);
    }

    /// Wait until a held call is parked
    pub async fn wait_until_parked(&self) {
        self.parked.notified().await;
    }

    /// Let the parked call continue
    pub fn release(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self, operation: &'static str) {
        let parked = {
            let mut held = self.held.lock();
            if *held == Some(operation) {
                *held = None;
                true
            } else {
                false
            }
        };
        if parked {
            self.parked.notify_one();
            if let Ok(permit) = self.release.acquire().await {
                permit.forget();
            }
        }
    }
}

#[async_trait]
impl DiagramRepository for GatedDiagramRepository {
    async fn load(&self, id: &DiagramId) -> Result<Option<DiagramRecord>, CoreError> {
        self.pass("load").await;
        self.inner.load(id).await
    }

    async fn save(&self, id: &DiagramId, graph: &Graph) -> Result<(), CoreError> {
        self.pass("save").await;
        self.inner.save(id, graph).await
    }

    async fn create(
        &self,
        name: &str,
        description: Option<String>,
        region: &str,
    ) -> Result<DiagramId, CoreError> {
        self.pass("create").await;
        self.inner.create(name, description, region).await
    }

    async fn delete(&self, id: &DiagramId) -> Result<(), CoreError> {
        self.pass("delete").await;
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<DiagramSummary>, CoreError> {
        self.pass("list").await;
        self.inner.list().await
    }
}
