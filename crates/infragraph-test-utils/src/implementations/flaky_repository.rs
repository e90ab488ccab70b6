use async_trait::async_trait;
use infragraph_core::{
    CoreError, DiagramId, DiagramRecord, DiagramRepository, DiagramSummary, Graph,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Wraps a diagram store and fails operations on demand.
///
/// Every call is recorded by operation name, whether it failed or not.
pub struct FlakyDiagramRepository {
    inner: Arc<dyn DiagramRepository>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_saves: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

impl FlakyDiagramRepository {
    /// Wrap `inner`; nothing fails until told to
    pub fn new(inner: Arc<dyn DiagramRepository>) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_saves: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `load` and `list` fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `save`, `create` and `delete` fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make only `save` fail
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Operation names in call order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn check(&self, operation: &'static str, flags: &[&AtomicBool]) -> Result<(), CoreError> {
        self.calls.lock().push(operation);
        if flags.iter().any(|flag| flag.load(Ordering::SeqCst)) {
            return Err(CoreError::StateStoreError(format!(
                "Injected failure in {}",
                operation
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DiagramRepository for FlakyDiagramRepository {
    async fn load(&self, id: &DiagramId) -> Result<Option<DiagramRecord>, CoreError> {
        self.check("load", &[&self.fail_reads])?;
        self.inner.load(id).await
    }

    async fn save(&self, id: &DiagramId, graph: &Graph) -> Result<(), CoreError> {
        self.check("save", &[&self.fail_writes, &self.fail_saves])?;
        self.inner.save(id, graph).await
    }

    async fn create(
        &self,
        name: &str,
        description: Option<String>,
        region: &str,
    ) -> Result<DiagramId, CoreError> {
        self.check("create", &[&self.fail_writes])?;
        self.inner.create(name, description, region).await
    }

    async fn delete(&self, id: &DiagramId) -> Result<(), CoreError> {
        self.check("delete", &[&self.fail_writes])?;
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<DiagramSummary>, CoreError> {
        self.check("list", &[&self.fail_reads])?;
        self.inner.list().await
    }
}
