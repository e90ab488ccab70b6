//! Editing and undo/redo behaviour of the editor over a real store.

use infragraph_core::{
    CoreError, DiagramEditor, Edge, EditorConfig, EditorEvent, Graph, GraphAction,
    HistoryLimits, HistoryState, Node, NodeId, NodeUpdate, ResourceKind, Transition,
    ValidationMode,
};
use infragraph_test_utils::{
    assert_edge_ids, assert_history_invariants, assert_node_ids, init_test_tracing,
    scenario_actions, GraphBuilder,
};
use infragraph_tests::{editor_for, memory_editor};
use pretty_assertions::assert_eq;

fn node(id: &str) -> Node {
    Node::new(id, ResourceKind::Ec2, id)
}

async fn current(editor: &DiagramEditor) -> Graph {
    editor.graph().await.expect("editor has a graph")
}

#[tokio::test]
async fn scenario_add_add_connect_undo_redo() -> anyhow::Result<()> {
    init_test_tracing();
    let editor = memory_editor();

    for action in scenario_actions() {
        assert_eq!(editor.dispatch(action).await?, Transition::Changed);
    }
    assert_eq!(editor.history_len().await, 3);
    assert_eq!(editor.history_index().await, 2);

    editor.undo().await?;
    let graph = current(&editor).await;
    assert_node_ids(&graph, &["n1", "n2"])?;
    assert_edge_ids(&graph, &[])?;
    assert!(editor.can_redo().await);

    editor.redo().await?;
    let graph = current(&editor).await;
    assert_edge_ids(&graph, &["e1"])?;
    assert_eq!(graph.metadata.name, "New Infrastructure");
    assert_eq!(graph.metadata.region, "us-east-1");
    assert!(!editor.can_redo().await);
    Ok(())
}

#[tokio::test]
async fn first_insertion_cannot_be_undone_without_a_baseline() -> anyhow::Result<()> {
    let editor = memory_editor();
    editor.add_node(node("a")).await?;

    assert!(!editor.can_undo().await);
    assert_eq!(editor.undo().await?, Transition::Unchanged);
    assert_node_ids(&current(&editor).await, &["a"])?;
    Ok(())
}

#[tokio::test]
async fn undo_returns_to_empty_baseline_of_opened_diagram() -> anyhow::Result<()> {
    let editor = memory_editor();
    editor.open_new("Scratch", None).await?;
    let baseline = current(&editor).await;

    editor.add_node(node("a")).await?;
    editor.add_node(node("b")).await?;
    editor.undo().await?;
    editor.undo().await?;

    assert_eq!(current(&editor).await, baseline);
    assert!(!editor.can_undo().await);
    assert!(editor.can_redo().await);
    Ok(())
}

#[tokio::test]
async fn new_edit_discards_redo_tail() -> anyhow::Result<()> {
    let editor = memory_editor();
    editor.add_node(node("a")).await?;
    editor.add_node(node("b")).await?;
    editor.add_node(node("c")).await?;
    editor.undo().await?;
    editor.undo().await?;

    editor.add_node(node("d")).await?;

    assert!(!editor.can_redo().await);
    assert_eq!(editor.history_len().await, 2);
    assert_node_ids(&current(&editor).await, &["a", "d"])?;
    Ok(())
}

#[tokio::test]
async fn removing_a_node_drops_its_edges_and_undo_restores_them() -> anyhow::Result<()> {
    let editor = memory_editor();
    editor
        .set_graph(
            GraphBuilder::new("Three tier")
                .node("lb", ResourceKind::Alb)
                .node("web", ResourceKind::Ec2)
                .node("db", ResourceKind::Rds)
                .edge("e1", "lb", "web", "routes_to")
                .edge("e2", "web", "db", "connects_to")
                .build(),
        )
        .await?;

    editor.remove_node("web").await?;
    let graph = current(&editor).await;
    assert_node_ids(&graph, &["lb", "db"])?;
    assert!(graph.edges.is_empty());

    editor.undo().await?;
    assert_edge_ids(&current(&editor).await, &["e1", "e2"])?;
    Ok(())
}

#[tokio::test]
async fn history_is_capped_at_fifty_snapshots() -> anyhow::Result<()> {
    let editor = memory_editor();
    for i in 0..60 {
        editor.add_node(node(&format!("n{}", i))).await?;
    }

    assert_eq!(editor.history_len().await, 50);
    assert_eq!(editor.history_index().await, 49);

    while editor.can_undo().await {
        editor.undo().await?;
    }
    // the oldest retained snapshot holds n0..=n10
    assert_eq!(current(&editor).await.nodes.len(), 11);
    Ok(())
}

#[tokio::test]
async fn lenient_mode_ignores_unknown_targets() -> anyhow::Result<()> {
    let editor = memory_editor();
    editor.add_node(node("a")).await?;

    assert_eq!(
        editor.update_node("ghost", NodeUpdate::label("x")).await?,
        Transition::Unchanged
    );
    assert_eq!(editor.remove_edge("ghost").await?, Transition::Unchanged);
    assert_eq!(editor.history_len().await, 1);
    Ok(())
}

#[tokio::test]
async fn strict_mode_from_configuration_rejects_bad_edits() -> anyhow::Result<()> {
    let config = EditorConfig {
        validation: ValidationMode::Strict,
        history_limit: 5,
        ..EditorConfig::default()
    };
    let editor = editor_for(config).await?;
    editor.add_node(node("a")).await?;

    assert_eq!(
        editor.add_node(node("a")).await,
        Err(CoreError::DuplicateNodeId("a".to_string()))
    );
    assert_eq!(
        editor.add_edge(Edge::new("e1", "a", "nowhere", "contains")).await,
        Err(CoreError::InvalidEdgeEndpoint {
            edge: "e1".to_string(),
            endpoint: "nowhere".to_string(),
        })
    );
    assert_eq!(editor.history_len().await, 1);

    for i in 0..10 {
        editor.add_node(node(&format!("n{}", i))).await?;
    }
    assert_eq!(editor.history_len().await, 5);
    Ok(())
}

#[tokio::test]
async fn subscribers_see_diffs_for_each_change() -> anyhow::Result<()> {
    let editor = memory_editor();
    let mut events = editor.subscribe();

    editor.add_node(node("a")).await?;
    editor.add_node(node("b")).await?;
    editor.update_node("a", NodeUpdate::position(10.0, 20.0)).await?;
    editor.undo().await?;
    editor.close().await?;

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert_eq!(seen.len(), 5);

    match &seen[2] {
        EditorEvent::GraphChanged { action, diff, .. } => {
            assert_eq!(*action, "UPDATE_NODE");
            assert_eq!(diff.modified_nodes, vec![NodeId::from("a")]);
        }
        other => panic!("unexpected event {:?}", other),
    }
    match &seen[3] {
        EditorEvent::GraphChanged {
            action,
            history_index,
            ..
        } => {
            assert_eq!(*action, "UNDO");
            assert_eq!(*history_index, 1);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(seen[4].event_type(), "diagram.closed");
    Ok(())
}

#[tokio::test]
async fn close_discards_graph_and_history() -> anyhow::Result<()> {
    let editor = memory_editor();
    editor.add_node(node("a")).await?;
    editor.add_node(node("b")).await?;

    editor.close().await?;

    let snapshot = editor.snapshot().await;
    assert_eq!(snapshot.graph, None);
    assert_eq!(snapshot.history_len, 0);
    assert_eq!(snapshot.history_index, 0);
    assert!(!snapshot.can_undo);
    assert!(!snapshot.can_redo);
    Ok(())
}

#[test]
fn reducer_invariants_hold_across_mixed_actions() -> anyhow::Result<()> {
    let mut state = HistoryState::new(HistoryLimits::new(4, ValidationMode::Lenient));
    let mut actions = scenario_actions();
    actions.extend([
        GraphAction::Undo,
        GraphAction::Undo,
        GraphAction::Undo,
        GraphAction::AddNode(node("n3")),
        GraphAction::AddNode(node("n4")),
        GraphAction::AddNode(node("n5")),
        GraphAction::AddNode(node("n6")),
        GraphAction::RemoveNode(NodeId::from("n1")),
        GraphAction::Redo,
        GraphAction::Undo,
        GraphAction::Clear,
        GraphAction::Undo,
    ]);

    for action in actions {
        state.apply(action)?;
        assert_history_invariants(&state)?;
    }
    assert!(state.graph().is_none());
    Ok(())
}
