//! Dedupe + encode as one unit of work

use anyhow::{Context, Result};
use gpumesh_common::{Corner, Deduplicator};
use std::path::Path;

use super::types::ConvertedMesh;
use crate::formats::write_mesh_file;

/// Deduplicate triangulated faces into GPU-ready buffers.
///
/// Fails if any face is not a triangle or the mesh needs more than 65535
/// unique vertices.
pub fn build_mesh<I, F>(faces: I) -> Result<ConvertedMesh>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[Corner]>,
{
    let faces = faces.into_iter();
    let mut dedup = Deduplicator::with_capacity(faces.size_hint().0);
    for face in faces {
        let face = face.as_ref();
        dedup
            .push_face(face)
            .with_context(|| format!("Failed to add face {}", dedup.face_count()))?;
    }

    let stats = dedup.stats();
    tracing::debug!(
        "Deduplicated {} corners into {} vertices ({} reused, {:.1}%)",
        stats.corner_count,
        stats.vertex_count,
        stats.reused_count,
        stats.reuse_ratio() * 100.0
    );

    Ok(ConvertedMesh {
        buffers: dedup.finish(),
        stats,
    })
}

/// Deduplicate faces and write the result to `output`.
///
/// Either the whole file is written or nothing is: every error is raised
/// before the output path is touched.
pub fn export_faces<I, F>(faces: I, output: &Path) -> Result<ConvertedMesh>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[Corner]>,
{
    let mesh = build_mesh(faces)?;
    write_mesh_file(output, &mesh.buffers)?;

    tracing::info!(
        "Wrote mesh: {} vertices, {} indices, {} bytes -> {:?}",
        mesh.vertex_count(),
        mesh.index_count(),
        mesh.buffers.encoded_len(),
        output
    );

    Ok(mesh)
}
