//! Application services

/// Editing session bridging the history to a diagram store
pub mod editor;
