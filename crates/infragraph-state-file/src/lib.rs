//! File-backed diagram store for InfraGraph
//!
//! Each diagram is kept as one pretty-printed JSON document named
//! `<diagram id>.json` under a root directory. Writes go to a temporary file
//! that is renamed over the target, so a crash never leaves a truncated
//! diagram behind.

pub mod repository;
pub use repository::FileDiagramRepository;
