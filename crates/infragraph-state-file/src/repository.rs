use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use infragraph_core::{
    CoreError, DiagramId, DiagramRecord, DiagramRepository, DiagramSummary, Graph,
};
use infragraph_monitoring::StoreMetrics;

const STORE_NAME: &str = "file";
const EXTENSION: &str = "json";

/// DiagramRepository storing one JSON file per diagram
pub struct FileDiagramRepository {
    root: PathBuf,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileDiagramRepository {
    /// Open a store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "File diagram store opened");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the diagram files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &DiagramId) -> Result<PathBuf, CoreError> {
        let valid = !id.0.is_empty()
            && id
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CoreError::StateStoreError(format!(
                "Invalid diagram id: {:?}",
                id.0
            )));
        }
        Ok(self.root.join(format!("{}.{}", id.0, EXTENSION)))
    }

    async fn read_record(path: &Path) -> Result<Option<DiagramRecord>, CoreError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_record(&self, path: &Path, record: &DiagramRecord) -> Result<(), CoreError> {
        let json = serde_json::to_vec_pretty(record)?;
        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_summaries(&self) -> Result<Vec<DiagramSummary>, CoreError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut summaries = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            match Self::read_record(&path).await {
                Ok(Some(record)) => summaries.push(record.summary()),
                Ok(None) => {}
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable diagram file"
                ),
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
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
}

#[async_trait]
impl DiagramRepository for FileDiagramRepository {
    async fn load(&self, id: &DiagramId) -> Result<Option<DiagramRecord>, CoreError> {
        let started = Instant::now();
        let path = self.path_for(id)?;
        let result = Self::read_record(&path).await;
        Self::record_metric("load", id.as_str(), started, result.is_ok());
        result
    }

    async fn save(&self, id: &DiagramId, graph: &Graph) -> Result<(), CoreError> {
        let started = Instant::now();
        let path = self.path_for(id)?;

        let result = async {
            let _guard = self.write_lock.lock().await;
            let mut record = Self::read_record(&path)
                .await?
                .ok_or_else(|| CoreError::DiagramNotFound(id.0.clone()))?;
            record.graph = graph.clone();
            record.updated_at = Utc::now();
            self.write_record(&path, &record).await
        }
        .await;

        Self::record_metric("save", id.as_str(), started, result.is_ok());
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
        let path = self.path_for(&id)?;
        let record = DiagramRecord::new(id.clone(), name, description, region);

        let result = {
            let _guard = self.write_lock.lock().await;
            self.write_record(&path, &record).await
        };

        Self::record_metric("create", id.as_str(), started, result.is_ok());
        result.map(|_| id)
    }

    async fn delete(&self, id: &DiagramId) -> Result<(), CoreError> {
        let started = Instant::now();
        let path = self.path_for(id)?;

        let result = {
            let _guard = self.write_lock.lock().await;
            match fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(CoreError::DiagramNotFound(id.0.clone()))
                }
                Err(e) => Err(e.into()),
            }
        };

        Self::record_metric("delete", id.as_str(), started, result.is_ok());
        result
    }

    async fn list(&self) -> Result<Vec<DiagramSummary>, CoreError> {
        let started = Instant::now();
        let result = self.read_summaries().await;
        Self::record_metric("list", "*", started, result.is_ok());
        result
    }
}
