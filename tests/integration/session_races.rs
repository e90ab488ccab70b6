//! Store calls that interleave with session changes on the same editor.

use std::sync::Arc;

use infragraph_core::{CoreError, DiagramEditor, DiagramRepository, Node, ResourceKind};
use infragraph_state_inmemory::InMemoryStateStoreProvider;
use infragraph_test_utils::{assert_node_ids, GatedDiagramRepository};
use pretty_assertions::assert_eq;

async fn stored_diagram(
    store: &Arc<dyn DiagramRepository>,
    name: &str,
    node: &str,
) -> anyhow::Result<infragraph_core::DiagramId> {
    let id = store.create(name, None, "us-east-1").await?;
    let mut graph = store.load(&id).await?.expect("created diagram loads").graph;
    graph.nodes.push(Node::new(node, ResourceKind::Ec2, node));
    store.save(&id, &graph).await?;
    Ok(id)
}

#[tokio::test]
async fn save_as_does_not_rebind_a_session_reopened_meanwhile() -> anyhow::Result<()> {
    let store = InMemoryStateStoreProvider::new().create_repository();
    let other = stored_diagram(&store, "Other", "other").await?;

    let gated = Arc::new(GatedDiagramRepository::new(store.clone()));
    let editor = Arc::new(DiagramEditor::with_defaults(gated.clone()));
    editor
        .add_node(Node::new("draft", ResourceKind::Lambda, "draft"))
        .await?;

    gated.hold("create");
    let pending = tokio::spawn({
        let editor = Arc::clone(&editor);
        async move { editor.save_as("Draft", None).await }
    });
    gated.wait_until_parked().await;

    editor.open(&other).await?;
    gated.release();

    assert_eq!(pending.await?, Err(CoreError::SessionChanged));
    assert_eq!(editor.diagram_id().await, Some(other.clone()));
    assert_node_ids(&editor.graph().await.expect("diagram is open"), &["other"])?;

    // the abandoned record is discarded and the open diagram saves to itself
    assert_eq!(editor.save().await?, other);
    let names: Vec<String> = editor
        .list_diagrams()
        .await?
        .into_iter()
        .map(|summary| summary.name)
        .collect();
    assert_eq!(names, vec!["Other".to_string()]);
    Ok(())
}

#[tokio::test]
async fn delete_does_not_close_a_diagram_opened_meanwhile() -> anyhow::Result<()> {
    let store = InMemoryStateStoreProvider::new().create_repository();
    let first = stored_diagram(&store, "First", "a").await?;
    let second = stored_diagram(&store, "Second", "b").await?;

    let gated = Arc::new(GatedDiagramRepository::new(store.clone()));
    let editor = Arc::new(DiagramEditor::with_defaults(gated.clone()));
    editor.open(&first).await?;

    gated.hold("delete");
    let pending = tokio::spawn({
        let editor = Arc::clone(&editor);
        let first = first.clone();
        async move { editor.delete(&first).await }
    });
    gated.wait_until_parked().await;

    editor.open(&second).await?;
    gated.release();
    pending.await??;

    assert_eq!(editor.diagram_id().await, Some(second));
    assert_node_ids(&editor.graph().await.expect("diagram is open"), &["b"])?;
    assert!(store.load(&first).await?.is_none());
    Ok(())
}
