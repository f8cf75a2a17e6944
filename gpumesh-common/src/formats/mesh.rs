//! GPU mesh binary format (.bin)
//!
//! Deduplicated vertex buffer followed by a u16 index buffer.
//! POD format - no magic bytes, no version, no padding. Little-endian.
//!
//! # Layout
//! ```text
//! 0x00: vertex_count u32
//! 0x04: index_count u32
//! 0x08: vertex_data (vertex_count * 32 bytes)
//!       pos.x pos.y pos.z  norm.x norm.y norm.z  uv.x uv.y  (f32 each)
//! var:  index_data (index_count * 2 bytes, u16)
//! ```

use std::io::{Read, Write};

use crate::dedup::{MeshBuffers, check_indices};
use crate::error::{MeshError, Result};
use crate::vertex::{MAX_VERTEX_COUNT, VERTEX_FLOATS, VERTEX_SIZE, Vertex};

/// File extension for encoded meshes (without dot)
pub const MESH_EXT: &str = "bin";

/// Size of one encoded index in bytes
pub const INDEX_SIZE: usize = size_of::<u16>();

/// GpuMesh header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct GpuMeshHeader {
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GpuMeshHeader {
    pub const SIZE: usize = 8;

    pub fn new(vertex_count: u32, index_count: u32) -> Self {
        Self {
            vertex_count,
            index_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.index_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            index_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }

    /// Total file size described by this header, `None` on overflow
    pub fn file_len(&self) -> Option<usize> {
        let vertex_bytes = (self.vertex_count as usize).checked_mul(VERTEX_SIZE)?;
        let index_bytes = (self.index_count as usize).checked_mul(INDEX_SIZE)?;
        Self::SIZE
            .checked_add(vertex_bytes)?
            .checked_add(index_bytes)
    }
}

/// Encoded size of a mesh: `8 + 32 * vertex_count + 2 * index_count`
pub fn encoded_len(vertex_count: usize, index_count: usize) -> usize {
    GpuMeshHeader::SIZE + vertex_count * VERTEX_SIZE + index_count * INDEX_SIZE
}

/// Build the header for `mesh`, rejecting buffers the format cannot represent.
fn header_for(mesh: &MeshBuffers) -> Result<GpuMeshHeader> {
    if mesh.vertices.len() > MAX_VERTEX_COUNT {
        return Err(MeshError::CapacityExceeded {
            limit: MAX_VERTEX_COUNT,
        });
    }
    check_indices(&mesh.indices, mesh.vertices.len())?;

    let index_count = u32::try_from(mesh.indices.len()).map_err(|_| {
        MeshError::CapacityExceeded {
            limit: u32::MAX as usize,
        }
    })?;
    Ok(GpuMeshHeader::new(mesh.vertices.len() as u32, index_count))
}

/// Encode a mesh into a new byte buffer.
///
/// Fails without producing any bytes if the vertex count does not fit u16
/// indices or an index points past the vertex buffer.
pub fn encode(mesh: &MeshBuffers) -> Result<Vec<u8>> {
    let header = header_for(mesh)?;

    let mut out = Vec::with_capacity(mesh.encoded_len());
    out.extend_from_slice(&header.to_bytes());
    for vertex in &mesh.vertices {
        for f in vertex.to_array() {
            out.extend_from_slice(&f.to_le_bytes());
        }
    }
    for index in &mesh.indices {
        out.extend_from_slice(&index.to_le_bytes());
    }

    Ok(out)
}

/// Write a complete GpuMesh file.
///
/// The mesh is encoded in full before the first write, so a rejected mesh
/// leaves the writer untouched.
pub fn write_mesh<W: Write>(w: &mut W, mesh: &MeshBuffers) -> Result<()> {
    let bytes = encode(mesh)?;
    w.write_all(&bytes)?;
    Ok(())
}

/// Decode a complete GpuMesh file.
///
/// The byte length must match the header exactly and every index must name
/// an existing vertex. Float bit patterns are preserved as stored.
pub fn decode(bytes: &[u8]) -> Result<MeshBuffers> {
    let header = GpuMeshHeader::from_bytes(bytes).ok_or(MeshError::Truncated {
        expected: GpuMeshHeader::SIZE,
        actual: bytes.len(),
    })?;

    let vertex_count = header.vertex_count as usize;
    if vertex_count > MAX_VERTEX_COUNT {
        return Err(MeshError::CapacityExceeded {
            limit: MAX_VERTEX_COUNT,
        });
    }

    let expected = header.file_len().unwrap_or(usize::MAX);
    if bytes.len() < expected {
        return Err(MeshError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(MeshError::TrailingBytes {
            expected,
            actual: bytes.len(),
        });
    }

    let (vertex_data, index_data) =
        bytes[GpuMeshHeader::SIZE..].split_at(vertex_count * VERTEX_SIZE);

    let vertices = vertex_data
        .chunks_exact(VERTEX_SIZE)
        .map(|chunk| {
            let mut floats = [0f32; VERTEX_FLOATS];
            for (f, b) in floats.iter_mut().zip(chunk.chunks_exact(4)) {
                *f = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
            }
            Vertex::from_array(floats)
        })
        .collect::<Vec<_>>();

    let indices = index_data
        .chunks_exact(INDEX_SIZE)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect::<Vec<_>>();

    check_indices(&indices, vertices.len())?;

    Ok(MeshBuffers { vertices, indices })
}

/// Read a complete GpuMesh file from a reader.
pub fn read_mesh<R: Read>(r: &mut R) -> Result<MeshBuffers> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshBuffers {
        MeshBuffers {
            vertices: vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_header_layout() {
        let header = GpuMeshHeader::new(0x0403_0201, 0x0807_0605);
        assert_eq!(header.to_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(GpuMeshHeader::from_bytes(&header.to_bytes()), Some(header));
        assert_eq!(GpuMeshHeader::new(3, 3).file_len(), Some(110));
        assert_eq!(encoded_len(3, 3), 110);
    }

    #[test]
    fn test_encode_triangle_bytes() {
        let bytes = encode(&triangle()).unwrap();
        assert_eq!(bytes.len(), 110);
        assert_eq!(&bytes[0..4], &3u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());

        // Second vertex pos.x
        assert_eq!(&bytes[8 + 32..8 + 36], &1.0f32.to_le_bytes());
        // First vertex norm.z
        assert_eq!(&bytes[8 + 20..8 + 24], &1.0f32.to_le_bytes());
        // Index buffer
        assert_eq!(&bytes[104..110], &[0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn test_empty_mesh() {
        let bytes = encode(&MeshBuffers::default()).unwrap();
        assert_eq!(bytes, vec![0u8; 8]);
        assert_eq!(decode(&bytes).unwrap(), MeshBuffers::default());
    }

    #[test]
    fn test_round_trip_preserves_bits() {
        let mesh = MeshBuffers {
            vertices: vec![
                Vertex::new([-0.0, 0.0, f32::MIN_POSITIVE], [0.0, -1.0, 0.0], [0.25, 0.75]),
                Vertex::new(
                    [f32::from_bits(0x7fc0_1234), 1.0, 2.0],
                    [0.0, 0.0, -0.0],
                    [f32::INFINITY, f32::NEG_INFINITY],
                ),
                Vertex::new([1e-42, 3.0, 4.0], [1.0, 0.0, 0.0], [0.1, 0.2]),
            ],
            indices: vec![2, 1, 0],
        };

        let decoded = decode(&encode(&mesh).unwrap()).unwrap();
        assert_eq!(decoded.indices, mesh.indices);
        for (a, b) in decoded.vertices.iter().zip(&mesh.vertices) {
            assert_eq!(a.key(), b.key());
        }
    }

    #[test]
    fn test_write_mesh_matches_encode() {
        let mut sink = Vec::new();
        write_mesh(&mut sink, &triangle()).unwrap();
        assert_eq!(sink, encode(&triangle()).unwrap());

        let decoded = read_mesh(&mut sink.as_slice()).unwrap();
        assert_eq!(decoded, triangle());
    }

    #[test]
    fn test_capacity_rejected_before_writing() {
        let mesh = MeshBuffers {
            vertices: vec![Vertex::default(); MAX_VERTEX_COUNT + 1],
            indices: vec![0, 0, 0],
        };
        let mut sink = Vec::new();
        let err = write_mesh(&mut sink, &mesh).unwrap_err();
        assert!(matches!(err, MeshError::CapacityExceeded { limit: 65535 }));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_encode_rejects_dangling_index() {
        let mut mesh = triangle();
        mesh.indices[1] = 3;
        let err = encode(&mesh).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                position: 1,
                index: 3,
                vertex_count: 3
            }
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encode(&triangle()).unwrap();

        let err = decode(&bytes[..5]).unwrap_err();
        assert!(matches!(err, MeshError::Truncated { expected: 8, actual: 5 }));

        let err = decode(&bytes[..109]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::Truncated {
                expected: 110,
                actual: 109
            }
        ));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut bytes = encode(&triangle()).unwrap();
        bytes.push(0);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            MeshError::TrailingBytes {
                expected: 110,
                actual: 111
            }
        ));
    }

    #[test]
    fn test_decode_rejects_oversized_vertex_count() {
        let header = GpuMeshHeader::new(65536, 0);
        let err = decode(&header.to_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_decode_rejects_dangling_index() {
        let mut bytes = encode(&triangle()).unwrap();
        // Last index -> 7
        bytes[108] = 7;
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                position: 2,
                index: 7,
                ..
            }
        ));
    }
}
