//! Re-deduplication of existing mesh files
//!
//! Unpacks an encoded mesh back to one corner per index and runs it through
//! the deduplicator again. For files this tool wrote the result is identical;
//! files from other exporters may shrink if they carried duplicate vertices.

use anyhow::{Context, Result};
use gpumesh_common::MeshBuffers;
use std::path::Path;

use super::pipeline::build_mesh;
use super::types::{ConvertedMesh, RedupReport};
use crate::formats::{read_mesh_file, write_mesh_file};

/// Re-deduplicate in-memory buffers
pub fn redup_mesh(mesh: &MeshBuffers) -> Result<ConvertedMesh> {
    let corners = mesh.unpack().context("Failed to unpack mesh")?;
    build_mesh(&corners)
}

/// Load a mesh file, re-deduplicate it, and write the result to `output`
pub fn redup_file(input: &Path, output: &Path) -> Result<RedupReport> {
    let original = read_mesh_file(input)?;
    let mesh = redup_mesh(&original).with_context(|| format!("Failed to redup {:?}", input))?;
    write_mesh_file(output, &mesh.buffers)?;

    let report = RedupReport {
        original_vertex_count: original.vertex_count(),
        original_index_count: original.index_count(),
        new_vertex_count: mesh.vertex_count(),
        new_index_count: mesh.index_count(),
    };

    tracing::info!(
        "Re-deduplicated {:?}: {} -> {} vertices, {} indices",
        input,
        report.original_vertex_count,
        report.new_vertex_count,
        report.new_index_count
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpumesh_common::{Vertex, dedupe};

    fn quad_faces() -> [[Vertex; 3]; 2] {
        let n = [0.0, 0.0, 1.0];
        let a = Vertex::new([0.0, 0.0, 0.0], n, [0.0, 0.0]);
        let b = Vertex::new([1.0, 0.0, 0.0], n, [1.0, 0.0]);
        let c = Vertex::new([0.0, 1.0, 0.0], n, [0.0, 1.0]);
        let d = Vertex::new([1.0, 1.0, 0.0], n, [1.0, 1.0]);
        [[a, b, c], [c, b, d]]
    }

    #[test]
    fn test_redup_is_stable() {
        let mesh = dedupe(quad_faces()).unwrap();
        let again = redup_mesh(&mesh).unwrap();
        assert_eq!(again.buffers, mesh);
    }

    #[test]
    fn test_redup_merges_unindexed_mesh() {
        // Every corner its own vertex, as a non-deduplicating exporter would write it
        let corners: Vec<Vertex> = quad_faces().iter().flatten().copied().collect();
        let flat = MeshBuffers {
            vertices: corners,
            indices: (0..6).collect(),
        };

        let mesh = redup_mesh(&flat).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.buffers.indices, vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(mesh.stats.reused_count, 2);
    }

    #[test]
    fn test_redup_rejects_partial_triangle() {
        let mut mesh = dedupe(quad_faces()).unwrap();
        mesh.indices.pop();
        assert!(redup_mesh(&mesh).is_err());
    }
}
