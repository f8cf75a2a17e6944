//! Types for mesh conversion

use gpumesh_common::{DedupStats, MeshBuffers};

/// Result of in-memory mesh conversion
#[derive(Debug, Clone)]
pub struct ConvertedMesh {
    /// Deduplicated vertex and index buffers
    pub buffers: MeshBuffers,
    /// How many corners were merged
    pub stats: DedupStats,
}

impl ConvertedMesh {
    pub fn vertex_count(&self) -> usize {
        self.buffers.vertex_count()
    }

    pub fn index_count(&self) -> usize {
        self.buffers.index_count()
    }
}

/// Vertex and index counts before and after re-deduplicating a mesh file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedupReport {
    pub original_vertex_count: usize,
    pub original_index_count: usize,
    pub new_vertex_count: usize,
    pub new_index_count: usize,
}

impl RedupReport {
    /// Vertices saved by re-deduplication (negative if the file had fewer)
    pub fn vertices_saved(&self) -> isize {
        self.original_vertex_count as isize - self.new_vertex_count as isize
    }
}
