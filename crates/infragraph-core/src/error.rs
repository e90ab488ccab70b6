use thiserror::Error;

/// Core error type for the InfraGraph editor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Diagram not found in the store
    #[error("Diagram not found: {0}")]
    DiagramNotFound(String),

    /// Node not found in the current graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Edge not found in the current graph
    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    /// A node with the same id already exists
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(String),

    /// An edge with the same id already exists
    #[error("Duplicate edge id: {0}")]
    DuplicateEdgeId(String),

    /// Edge endpoint references a node that does not exist
    #[error("Edge {edge} references missing node: {endpoint}")]
    InvalidEdgeEndpoint {
        /// Edge being added
        edge: String,
        /// The missing node id
        endpoint: String,
    },

    /// Operation requires an open diagram
    #[error("No diagram is open")]
    NoDiagramOpen,

    /// The session was reopened or closed while an operation was in flight
    #[error("Editor session changed during the operation")]
    SessionChanged,

    /// State store error
    #[error("State store error: {0}")]
    StateStoreError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Input/output error
    #[error("Input/output error: {0}")]
    IOError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::IOError(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigurationError(err.to_string())
    }
}

impl From<String> for CoreError {
    fn from(err: String) -> Self {
        CoreError::Other(err)
    }
}

impl From<&str> for CoreError {
    fn from(err: &str) -> Self {
        CoreError::Other(err.to_string())
    }
}
