//! Diagram editor service
//!
//! Owns the current graph and its undo/redo history for one editing session
//! and bridges it to a [`DiagramRepository`]. All updates go through a single
//! async mutex, so concurrent callers are applied one at a time.

use chrono::Utc;
use infragraph_monitoring::LogExt;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::EditorConfig,
    domain::diff::GraphDiff,
    domain::events::EditorEvent,
    domain::graph::{DiagramId, Edge, EdgeId, Graph, Node, NodeId, NodeUpdate},
    domain::history::{GraphAction, HistoryState, Transition},
    domain::repository::{DiagramRepository, DiagramSummary},
    CoreError,
};

/// Read-only copy of the editor state
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    /// Diagram the graph belongs to, if any
    pub diagram_id: Option<DiagramId>,
    /// Current graph
    pub graph: Option<Graph>,
    /// History cursor
    pub history_index: usize,
    /// Number of retained snapshots
    pub history_len: usize,
    /// Whether undo is possible
    pub can_undo: bool,
    /// Whether redo is possible
    pub can_redo: bool,
}

struct EditorState {
    diagram_id: Option<DiagramId>,
    history: HistoryState,
    // bumped when the session is reopened or closed
    session: u64,
}

/// Editing session over one diagram at a time
pub struct DiagramEditor {
    state: Mutex<EditorState>,
    repository: Arc<dyn DiagramRepository>,
    config: EditorConfig,
    events: broadcast::Sender<EditorEvent>,
}

impl DiagramEditor {
    /// Create an editor with no open diagram
    pub fn new(repository: Arc<dyn DiagramRepository>, config: EditorConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            state: Mutex::new(EditorState {
                diagram_id: None,
                history: HistoryState::new(config.history_limits()),
                session: 0,
            }),
            repository,
            config,
            events,
        }
    }

    /// Create an editor with the default configuration
    pub fn with_defaults(repository: Arc<dyn DiagramRepository>) -> Self {
        Self::new(repository, EditorConfig::default())
    }

    /// Configuration in use
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Receive change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }

    /// Apply an action to the history and notify subscribers if it changed anything
    pub async fn dispatch(&self, action: GraphAction) -> Result<Transition, CoreError> {
        let mut state = self.state.lock().await;
        let (transition, event) = Self::apply_locked(&mut state, action)?;
        drop(state);

        if let Some(event) = event {
            self.publish(event);
        }
        Ok(transition)
    }

    /// Replace the whole graph
    pub async fn set_graph(&self, graph: Graph) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::SetGraph(graph)).await
    }

    /// Append a node, creating a graph if none exists
    pub async fn add_node(&self, node: Node) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::AddNode(node)).await
    }

    /// Shallow-merge changes into a node
    pub async fn update_node(
        &self,
        id: impl Into<NodeId>,
        changes: NodeUpdate,
    ) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::UpdateNode {
            id: id.into(),
            changes,
        })
        .await
    }

    /// Remove a node and the edges touching it
    pub async fn remove_node(&self, id: impl Into<NodeId>) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::RemoveNode(id.into())).await
    }

    /// Append an edge
    pub async fn add_edge(&self, edge: Edge) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::AddEdge(edge)).await
    }

    /// Remove an edge
    pub async fn remove_edge(&self, id: impl Into<EdgeId>) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::RemoveEdge(id.into())).await
    }

    /// Step back one snapshot
    pub async fn undo(&self) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::Undo).await
    }

    /// Step forward one snapshot
    pub async fn redo(&self) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::Redo).await
    }

    /// Discard the graph and its history
    pub async fn close(&self) -> Result<Transition, CoreError> {
        self.dispatch(GraphAction::Clear).await
    }

    /// Current graph
    pub async fn graph(&self) -> Option<Graph> {
        self.state.lock().await.history.graph().cloned()
    }

    /// Whether undo is possible
    pub async fn can_undo(&self) -> bool {
        self.state.lock().await.history.can_undo()
    }

    /// Whether redo is possible
    pub async fn can_redo(&self) -> bool {
        self.state.lock().await.history.can_redo()
    }

    /// Number of retained snapshots
    pub async fn history_len(&self) -> usize {
        self.state.lock().await.history.len()
    }

    /// History cursor
    pub async fn history_index(&self) -> usize {
        self.state.lock().await.history.history_index()
    }

    /// Diagram currently open, if any
    pub async fn diagram_id(&self) -> Option<DiagramId> {
        self.state.lock().await.diagram_id.clone()
    }

    /// Copy of the whole editor state
    pub async fn snapshot(&self) -> EditorSnapshot {
        let state = self.state.lock().await;
        EditorSnapshot {
            diagram_id: state.diagram_id.clone(),
            graph: state.history.graph().cloned(),
            history_index: state.history.history_index(),
            history_len: state.history.len(),
            can_undo: state.history.can_undo(),
            can_redo: state.history.can_redo(),
        }
    }

    /// Create a diagram in the store and open it with an empty graph
    #[instrument(skip(self, description))]
    pub async fn open_new(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<DiagramId, CoreError> {
        let id = self
            .repository
            .create(name, description, &self.config.default_region)
            .await?;
        self.open(&id).await?;
        Ok(id)
    }

    /// Load a diagram and make it the single baseline snapshot
    #[instrument(skip(self), fields(diagram_id = %id))]
    pub async fn open(&self, id: &DiagramId) -> Result<(), CoreError> {
        let record = self
            .repository
            .load(id)
            .await
            .log_err("Diagram load failed")?
            .ok_or_else(|| CoreError::DiagramNotFound(id.0.clone()))?;

        {
            let mut state = self.state.lock().await;
            state.history = HistoryState::with_graph(self.config.history_limits(), record.graph);
            state.diagram_id = Some(id.clone());
            state.session += 1;
        }

        info!(diagram_id = %id, name = %record.name, "Diagram opened");
        self.publish(EditorEvent::DiagramOpened {
            diagram_id: id.clone(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Write the current graph to the open diagram.
    ///
    /// A failed save leaves the history untouched.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<DiagramId, CoreError> {
        let (id, graph) = {
            let state = self.state.lock().await;
            match (&state.diagram_id, state.history.graph()) {
                (Some(id), Some(graph)) => (id.clone(), graph.clone()),
                _ => return Err(CoreError::NoDiagramOpen),
            }
        };

        self.repository
            .save(&id, &graph)
            .await
            .log_err("Diagram save failed")?;

        info!(
            diagram_id = %id,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Diagram saved"
        );
        self.publish(EditorEvent::DiagramSaved {
            diagram_id: id.clone(),
            timestamp: Utc::now(),
        });
        Ok(id)
    }

    /// Store the current graph as a new diagram and bind the session to it.
    ///
    /// History is kept, so edits made before the first save can still be undone.
    /// If the session is reopened or closed before the new record is written,
    /// the record is discarded and [`CoreError::SessionChanged`] is returned.
    #[instrument(skip(self, description))]
    pub async fn save_as(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<DiagramId, CoreError> {
        let (session, graph) = {
            let state = self.state.lock().await;
            let graph = state.history.graph().cloned().ok_or(CoreError::NoDiagramOpen)?;
            (state.session, graph)
        };

        let id = self
            .repository
            .create(name, description, &graph.metadata.region)
            .await
            .log_err("Diagram create failed")?;

        if let Err(e) = self
            .repository
            .save(&id, &graph)
            .await
            .log_err("Diagram save failed")
        {
            self.discard(&id).await;
            return Err(e);
        }

        {
            let mut state = self.state.lock().await;
            if state.session != session {
                drop(state);
                warn!(diagram_id = %id, "Session changed during save as");
                self.discard(&id).await;
                return Err(CoreError::SessionChanged);
            }
            state.diagram_id = Some(id.clone());
        }

        info!(diagram_id = %id, "Diagram saved as new");
        self.publish(EditorEvent::DiagramSaved {
            diagram_id: id.clone(),
            timestamp: Utc::now(),
        });
        Ok(id)
    }

    /// Delete a stored diagram, closing it if it is open
    #[instrument(skip(self), fields(diagram_id = %id))]
    pub async fn delete(&self, id: &DiagramId) -> Result<(), CoreError> {
        self.repository
            .delete(id)
            .await
            .log_err("Diagram delete failed")?;

        let closed = {
            let mut state = self.state.lock().await;
            if state.diagram_id.as_ref() == Some(id) {
                Self::apply_locked(&mut state, GraphAction::Clear)?.1
            } else {
                None
            }
        };

        let was_open = closed.is_some();
        if let Some(event) = closed {
            self.publish(event);
        }
        info!(diagram_id = %id, was_open, "Diagram deleted");
        Ok(())
    }

    /// List stored diagrams
    pub async fn list_diagrams(&self) -> Result<Vec<DiagramSummary>, CoreError> {
        self.repository.list().await
    }

    /// Apply an action under the state lock, returning the event to publish
    fn apply_locked(
        state: &mut EditorState,
        action: GraphAction,
    ) -> Result<(Transition, Option<EditorEvent>), CoreError> {
        let name = action.name();
        let is_clear = matches!(action, GraphAction::Clear);

        let before = state.history.graph().cloned();
        let transition = state.history.apply(action)?;

        if !transition.is_changed() {
            return Ok((transition, None));
        }

        if is_clear {
            let diagram_id = state.diagram_id.take();
            state.session += 1;
            info!(diagram_id = ?diagram_id, "Diagram closed");
            let event = EditorEvent::DiagramClosed {
                diagram_id,
                timestamp: Utc::now(),
            };
            return Ok((transition, Some(event)));
        }

        let event = EditorEvent::GraphChanged {
            diagram_id: state.diagram_id.clone(),
            action: name,
            diff: diff_of(before.as_ref(), state.history.graph()),
            history_index: state.history.history_index(),
            history_len: state.history.len(),
            timestamp: Utc::now(),
        };
        Ok((transition, Some(event)))
    }

    /// Best-effort removal of a record this editor created
    async fn discard(&self, id: &DiagramId) {
        let _ = self
            .repository
            .delete(id)
            .await
            .log_err("Failed to discard diagram record");
    }

    fn publish(&self, event: EditorEvent) {
        let event_type = event.event_type();
        if self.events.send(event).is_err() {
            debug!(event_type, "No subscribers for editor event");
        }
    }
}

fn diff_of(before: Option<&Graph>, after: Option<&Graph>) -> GraphDiff {
    match (before, after) {
        (Some(before), Some(after)) => GraphDiff::between(before, after),
        (None, Some(after)) => GraphDiff::between(&empty_like(after), after),
        (Some(before), None) => GraphDiff::between(before, &empty_like(before)),
        (None, None) => GraphDiff::default(),
    }
}

fn empty_like(graph: &Graph) -> Graph {
    Graph::empty(
        graph.metadata.name.clone(),
        graph.metadata.region.clone(),
        graph.metadata.created_at,
    )
}
