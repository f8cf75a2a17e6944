//! Reading and writing GPU mesh files on disk
//!
//! Re-exports the binary format from gpumesh-common and adds file handling.

pub use gpumesh_common::formats::*;

use anyhow::{Context, Result};
use gpumesh_common::MeshBuffers;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a complete GpuMesh file
///
/// The mesh is encoded in memory first, then written to a temporary file next
/// to `output` and renamed into place. On any failure `output` is left as it
/// was and no partial file remains.
pub fn write_mesh_file(output: &Path, mesh: &MeshBuffers) -> Result<()> {
    let bytes = encode(mesh).with_context(|| format!("Failed to encode mesh for {:?}", output))?;

    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    tmp.write_all(&bytes)
        .with_context(|| format!("Failed to write mesh data for {:?}", output))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush mesh data for {:?}", output))?;
    tmp.persist(output)
        .with_context(|| format!("Failed to create output: {:?}", output))?;

    Ok(())
}

/// Read and validate a GpuMesh file
pub fn read_mesh_file(input: &Path) -> Result<MeshBuffers> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to open mesh: {:?}", input))?;
    decode(&bytes).with_context(|| format!("Invalid mesh file: {:?}", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpumesh_common::{MeshError, Vertex};
    use tempfile::tempdir;

    fn quad() -> MeshBuffers {
        let n = [0.0, 0.0, 1.0];
        MeshBuffers {
            vertices: vec![
                Vertex::new([0.0, 0.0, 0.0], n, [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], n, [1.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], n, [0.0, 1.0]),
                Vertex::new([1.0, 1.0, 0.0], n, [1.0, 1.0]),
            ],
            indices: vec![0, 1, 2, 2, 1, 3],
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quad.bin");

        write_mesh_file(&path, &quad()).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 8 + 4 * 32 + 6 * 2);
        assert_eq!(read_mesh_file(&path).unwrap(), quad());
    }

    #[test]
    fn test_rejected_mesh_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.bin");

        let mut mesh = quad();
        mesh.indices.push(9);
        let err = write_mesh_file(&path, &mesh).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MeshError>(),
            Some(MeshError::IndexOutOfRange { index: 9, .. })
        ));

        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rejected_mesh_keeps_previous_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quad.bin");
        write_mesh_file(&path, &quad()).unwrap();
        let before = std::fs::read(&path).unwrap();

        let mut mesh = quad();
        mesh.indices[0] = 100;
        assert!(write_mesh_file(&path, &mesh).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_read_truncated_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [2, 0, 0, 0, 0, 0, 0, 0]).unwrap();

        let err = read_mesh_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MeshError>(),
            Some(MeshError::Truncated {
                expected: 72,
                actual: 8
            })
        ));
    }
}
