//! Shared setup for the InfraGraph cross-crate tests.

use std::sync::Arc;

use infragraph_core::{DiagramEditor, DiagramRepository, EditorConfig, StoreConfig};
use infragraph_state_file::FileDiagramRepository;
use infragraph_state_inmemory::InMemoryStateStoreProvider;

/// Build the diagram store named by `config`
pub async fn repository_for(config: &StoreConfig) -> anyhow::Result<Arc<dyn DiagramRepository>> {
    let repository: Arc<dyn DiagramRepository> = match config {
        StoreConfig::Memory => InMemoryStateStoreProvider::new().create_repository(),
        StoreConfig::File { root } => Arc::new(FileDiagramRepository::open(root.clone()).await?),
    };
    Ok(repository)
}

/// Editor over the store its configuration selects
pub async fn editor_for(config: EditorConfig) -> anyhow::Result<DiagramEditor> {
    let repository = repository_for(&config.store).await?;
    Ok(DiagramEditor::new(repository, config))
}

/// Editor over a fresh in-memory store with default settings
pub fn memory_editor() -> DiagramEditor {
    DiagramEditor::with_defaults(InMemoryStateStoreProvider::new().create_repository())
}
