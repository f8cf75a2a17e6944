//! Errors raised while building, encoding or decoding a mesh.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MeshError>;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The deduplicated vertex buffer would not be addressable by `u16` indices.
    #[error("mesh needs more than {limit} unique vertices, u16 index space exhausted")]
    CapacityExceeded { limit: usize },

    /// A face handed to the deduplicator was not a triangle.
    #[error("face {face} has {corners} corners, expected a triangle")]
    MalformedFace { face: usize, corners: usize },

    #[error("mesh data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("mesh data has trailing bytes: expected {expected} bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },

    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u16,
        vertex_count: usize,
    },

    #[error("index count {count} is not a multiple of 3")]
    InvalidIndexCount { count: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
