//! Domain layer - graph model, edit history and persistence contracts

/// Graph, node and edge value types
pub mod graph;

/// Undo/redo history reducer
pub mod history;

/// Structural diff between graphs
pub mod diff;

/// Editor notifications
pub mod events;

/// Diagram store contract
pub mod repository;
