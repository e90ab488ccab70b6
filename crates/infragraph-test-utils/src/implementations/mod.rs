//! Test implementations (fakes) of core traits.

mod flaky_repository;
mod gated_repository;

pub use flaky_repository::FlakyDiagramRepository;
pub use gated_repository::GatedDiagramRepository;
