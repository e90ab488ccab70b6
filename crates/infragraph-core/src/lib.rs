//!
//! InfraGraph Core - graph model and edit history for infrastructure diagrams
//!
//! This crate defines the diagram data model, the bounded undo/redo history
//! that every edit goes through, the contract of the remote diagram store,
//! and the editor service tying them together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - graph model, history reducer and repository contracts
pub mod domain;

/// Application services - the diagram editor
pub mod application;

/// Editor configuration
pub mod config;

/// Error types
pub mod error;

// Re-export key types
pub use error::CoreError;

pub use application::editor::{DiagramEditor, EditorSnapshot};
pub use config::{EditorConfig, StoreConfig};
pub use domain::diff::GraphDiff;
pub use domain::events::EditorEvent;
pub use domain::graph::{
    DiagramId, Edge, EdgeId, Graph, GraphMetadata, Node, NodeId, NodeUpdate, Position,
    ResourceKind,
};
pub use domain::history::{
    GraphAction, HistoryLimits, HistoryState, Transition, ValidationMode,
    DEFAULT_HISTORY_CAPACITY,
};
pub use domain::repository::{DiagramRecord, DiagramRepository, DiagramSummary};
