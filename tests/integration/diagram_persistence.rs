//! Opening, saving and listing diagrams through both store backends.

use std::sync::Arc;

use infragraph_core::{
    CoreError, DiagramEditor, DiagramRepository, EditorConfig, Node, NodeUpdate, ResourceKind,
    StoreConfig,
};
use infragraph_state_file::FileDiagramRepository;
use infragraph_state_inmemory::InMemoryStateStoreProvider;
use infragraph_test_utils::{assert_node_ids, FlakyDiagramRepository};
use infragraph_tests::{editor_for, repository_for};
use pretty_assertions::assert_eq;

async fn edit_and_save(editor: &DiagramEditor) -> anyhow::Result<()> {
    editor
        .add_node(Node::new("vpc", ResourceKind::Vpc, "main").at(0.0, 0.0))
        .await?;
    editor
        .add_node(Node::new("web", ResourceKind::Ec2, "web").at(120.0, 40.0))
        .await?;
    editor
        .update_node("web", NodeUpdate::label("web-1"))
        .await?;
    editor.save().await?;
    Ok(())
}

async fn round_trip(repository: Arc<dyn DiagramRepository>) -> anyhow::Result<()> {
    let editor = DiagramEditor::with_defaults(repository.clone());
    let id = editor.open_new("Production", Some("prod vpc".to_string())).await?;
    edit_and_save(&editor).await?;

    let reopened = DiagramEditor::with_defaults(repository);
    reopened.open(&id).await?;

    let graph = reopened.graph().await.expect("diagram is open");
    assert_node_ids(&graph, &["vpc", "web"])?;
    assert_eq!(graph.nodes[1].label, "web-1");
    assert_eq!(graph.metadata.name, "Production");
    assert_eq!(reopened.history_len().await, 1);
    assert!(!reopened.can_undo().await);

    let summaries = reopened.list_diagrams().await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].node_count, 2);
    assert_eq!(summaries[0].description.as_deref(), Some("prod vpc"));
    Ok(())
}

#[tokio::test]
async fn memory_store_round_trip() -> anyhow::Result<()> {
    round_trip(InMemoryStateStoreProvider::new().create_repository()).await
}

#[tokio::test]
async fn file_store_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let repository = FileDiagramRepository::open(dir.path()).await?;
    round_trip(Arc::new(repository)).await
}

#[tokio::test]
async fn file_store_survives_reopening_the_directory() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = EditorConfig {
        store: StoreConfig::File {
            root: dir.path().join("diagrams"),
        },
        ..EditorConfig::default()
    };

    let id = {
        let editor = editor_for(config.clone()).await?;
        let id = editor.open_new("Persistent", None).await?;
        edit_and_save(&editor).await?;
        id
    };

    let editor = editor_for(config).await?;
    editor.open(&id).await?;
    assert_eq!(editor.graph().await.map(|g| g.nodes.len()), Some(2));

    let raw = std::fs::read_to_string(dir.path().join("diagrams").join(format!("{}.json", id)))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(value["graph"]["nodes"][1]["type"], "ec2");
    assert_eq!(value["graph"]["nodes"][1]["position"]["x"], 120.0);
    Ok(())
}

#[tokio::test]
async fn failed_save_keeps_history_and_can_be_retried() -> anyhow::Result<()> {
    let flaky = Arc::new(FlakyDiagramRepository::new(
        InMemoryStateStoreProvider::new().create_repository(),
    ));
    let editor = DiagramEditor::with_defaults(flaky.clone());
    let id = editor.open_new("Flaky", None).await?;
    editor
        .add_node(Node::new("q", ResourceKind::Sqs, "jobs"))
        .await?;

    flaky.fail_writes(true);
    assert!(matches!(
        editor.save().await,
        Err(CoreError::StateStoreError(_))
    ));
    assert_eq!(editor.history_len().await, 2);
    assert!(editor.can_undo().await);

    flaky.fail_writes(false);
    assert_eq!(editor.save().await?, id);
    assert_eq!(flaky.calls(), vec!["create", "load", "save", "save"]);
    Ok(())
}

#[tokio::test]
async fn failed_open_leaves_current_session_alone() -> anyhow::Result<()> {
    let flaky = Arc::new(FlakyDiagramRepository::new(
        InMemoryStateStoreProvider::new().create_repository(),
    ));
    let editor = DiagramEditor::with_defaults(flaky.clone());
    let id = editor.open_new("Keep", None).await?;
    editor
        .add_node(Node::new("a", ResourceKind::Lambda, "fn"))
        .await?;

    flaky.fail_reads(true);
    assert!(editor.open(&id).await.is_err());
    assert_eq!(editor.diagram_id().await, Some(id));
    assert_eq!(editor.history_len().await, 2);
    Ok(())
}

#[tokio::test]
async fn save_as_then_delete() -> anyhow::Result<()> {
    let repository = repository_for(&StoreConfig::Memory).await?;
    let editor = DiagramEditor::with_defaults(repository);
    editor
        .add_node(Node::new("a", ResourceKind::S3, "assets"))
        .await?;

    assert_eq!(editor.save().await, Err(CoreError::NoDiagramOpen));
    let id = editor.save_as("Assets", None).await?;
    assert_eq!(editor.diagram_id().await, Some(id.clone()));
    assert_eq!(editor.list_diagrams().await?.len(), 1);

    editor.delete(&id).await?;
    assert_eq!(editor.diagram_id().await, None);
    assert_eq!(editor.graph().await, None);
    assert!(editor.list_diagrams().await?.is_empty());
    assert!(matches!(
        editor.open(&id).await,
        Err(CoreError::DiagramNotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn failed_save_as_leaves_no_orphan_record() -> anyhow::Result<()> {
    let flaky = Arc::new(FlakyDiagramRepository::new(
        InMemoryStateStoreProvider::new().create_repository(),
    ));
    let editor = DiagramEditor::with_defaults(flaky.clone());
    editor
        .add_node(Node::new("cache", ResourceKind::ElastiCache, "redis"))
        .await?;

    flaky.fail_saves(true);
    for _ in 0..3 {
        assert!(matches!(
            editor.save_as("Draft", None).await,
            Err(CoreError::StateStoreError(_))
        ));
    }
    assert!(editor.list_diagrams().await?.is_empty());
    assert_eq!(editor.diagram_id().await, None);

    flaky.fail_saves(false);
    let id = editor.save_as("Draft", None).await?;
    assert_eq!(editor.list_diagrams().await?.len(), 1);
    assert_eq!(editor.diagram_id().await, Some(id));
    Ok(())
}
