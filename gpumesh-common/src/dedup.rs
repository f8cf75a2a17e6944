//! Vertex deduplication
//!
//! Turns a stream of triangulated faces into a vertex buffer of unique
//! attribute triples plus a u16 index buffer referencing it.
//!
//! Two corners share a vertex only if all 8 components are bit-identical
//! (see [`VertexKey`]). There is no tolerance: corners whose normals differ in
//! the last bit stay separate vertices, so output counts are reproducible.

use hashbrown::HashMap;

use crate::error::{MeshError, Result};
use crate::formats::encoded_len;
use crate::vertex::{Corner, MAX_VERTEX_COUNT, Vertex, VertexKey};

/// Corners per face accepted by the deduplicator
pub const CORNERS_PER_FACE: usize = 3;

/// Deduplicated vertex and index buffers, ready for encoding or upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Unique vertices in first-seen order
    pub vertices: Vec<Vertex>,
    /// One index per input corner, in face then corner order
    pub indices: Vec<u16>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / CORNERS_PER_FACE
    }

    /// Size of these buffers once encoded to the binary format
    pub fn encoded_len(&self) -> usize {
        encoded_len(self.vertices.len(), self.indices.len())
    }

    /// Index triples in winding order
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices
            .chunks_exact(CORNERS_PER_FACE)
            .map(|t| [t[0], t[1], t[2]])
    }

    /// Vertex buffer as raw bytes (native endianness) for direct GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes (native endianness) for direct GPU upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Check the buffer invariants: vertex count fits u16 indices, every index
    /// names an existing vertex, and indices form whole triangles.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() > MAX_VERTEX_COUNT {
            return Err(MeshError::CapacityExceeded {
                limit: MAX_VERTEX_COUNT,
            });
        }
        if self.indices.len() % CORNERS_PER_FACE != 0 {
            return Err(MeshError::InvalidIndexCount {
                count: self.indices.len(),
            });
        }
        check_indices(&self.indices, self.vertices.len())
    }

    /// Expand the indexed mesh back into one corner per index.
    ///
    /// This is the inverse of [`dedupe`]: `dedupe(buffers.unpack())` yields the
    /// same buffers again for any mesh `dedupe` produced.
    pub fn unpack(&self) -> Result<Vec<[Corner; 3]>> {
        if self.indices.len() % CORNERS_PER_FACE != 0 {
            return Err(MeshError::InvalidIndexCount {
                count: self.indices.len(),
            });
        }
        check_indices(&self.indices, self.vertices.len())?;

        Ok(self
            .triangles()
            .map(|tri| tri.map(|i| self.vertices[i as usize]))
            .collect())
    }
}

pub(crate) fn check_indices(indices: &[u16], vertex_count: usize) -> Result<()> {
    match indices
        .iter()
        .enumerate()
        .find(|&(_, &i)| i as usize >= vertex_count)
    {
        Some((position, &index)) => Err(MeshError::IndexOutOfRange {
            position,
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

/// Counters describing how much a deduplication pass merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Corners consumed (equals the index count)
    pub corner_count: usize,
    /// Unique vertices emitted
    pub vertex_count: usize,
    /// Corners that reused an existing vertex
    pub reused_count: usize,
}

impl DedupStats {
    /// Fraction of corners that were merged into an existing vertex
    pub fn reuse_ratio(&self) -> f32 {
        if self.corner_count == 0 {
            0.0
        } else {
            self.reused_count as f32 / self.corner_count as f32
        }
    }
}

/// Incremental vertex deduplicator.
///
/// Feed faces with [`push_face`](Self::push_face) in traversal order, then call
/// [`finish`](Self::finish). A failed push leaves the buffers as they were
/// before that face.
#[derive(Debug, Default)]
pub struct Deduplicator {
    lookup: HashMap<VertexKey, u16>,
    buffers: MeshBuffers,
    face_count: usize,
    reused_count: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `faces` triangles.
    pub fn with_capacity(faces: usize) -> Self {
        let corners = faces.saturating_mul(CORNERS_PER_FACE);
        let vertices = corners.min(MAX_VERTEX_COUNT);
        Self {
            lookup: HashMap::with_capacity(vertices),
            buffers: MeshBuffers {
                vertices: Vec::with_capacity(vertices),
                indices: Vec::with_capacity(corners),
            },
            face_count: 0,
            reused_count: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.buffers.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.buffers.indices.len()
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    pub fn stats(&self) -> DedupStats {
        DedupStats {
            corner_count: self.buffers.indices.len(),
            vertex_count: self.buffers.vertices.len(),
            reused_count: self.reused_count,
        }
    }

    /// Add one triangle.
    ///
    /// Fails with [`MeshError::MalformedFace`] if `face` is not exactly three
    /// corners and with [`MeshError::CapacityExceeded`] if it would introduce
    /// vertex number 65536.
    pub fn push_face(&mut self, face: &[Corner]) -> Result<()> {
        if face.len() != CORNERS_PER_FACE {
            return Err(MeshError::MalformedFace {
                face: self.face_count,
                corners: face.len(),
            });
        }

        let mut resolved = [0u16; CORNERS_PER_FACE];
        let mut added = 0usize;
        for (slot, corner) in resolved.iter_mut().zip(face) {
            match self.resolve(corner) {
                Ok((index, is_new)) => {
                    *slot = index;
                    if is_new {
                        added += 1;
                    }
                }
                Err(e) => {
                    self.rollback(added);
                    return Err(e);
                }
            }
        }

        self.reused_count += CORNERS_PER_FACE - added;
        self.buffers.indices.extend_from_slice(&resolved);
        self.face_count += 1;
        Ok(())
    }

    /// Consume the deduplicator and hand back the finished buffers.
    pub fn finish(self) -> MeshBuffers {
        self.buffers
    }

    /// Look up a corner, appending a new vertex if it has not been seen yet.
    /// Returns the vertex index and whether it was just created.
    fn resolve(&mut self, corner: &Corner) -> Result<(u16, bool)> {
        let key = corner.key();
        if let Some(&index) = self.lookup.get(&key) {
            return Ok((index, false));
        }

        let next = self.buffers.vertices.len();
        if next >= MAX_VERTEX_COUNT {
            return Err(MeshError::CapacityExceeded {
                limit: MAX_VERTEX_COUNT,
            });
        }

        let index = next as u16;
        self.lookup.insert(key, index);
        self.buffers.vertices.push(*corner);
        Ok((index, true))
    }

    /// Drop the last `added` vertices appended by a face that failed midway.
    fn rollback(&mut self, added: usize) {
        for _ in 0..added {
            if let Some(v) = self.buffers.vertices.pop() {
                self.lookup.remove(&v.key());
            }
        }
    }
}

/// Deduplicate a sequence of triangles into vertex and index buffers.
///
/// Faces are visited in order and corners within a face in order; the index
/// buffer preserves that order so winding is unchanged. Each face must have
/// exactly three corners.
///
/// # Example
///
/// ```
/// use gpumesh_common::{dedupe, Vertex};
///
/// let a = Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
/// let b = Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]);
/// let c = Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]);
/// let d = Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]);
///
/// let mesh = dedupe(&[[a, b, c], [c, b, d]]).unwrap();
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.indices, vec![0, 1, 2, 2, 1, 3]);
/// ```
pub fn dedupe<I, F>(faces: I) -> Result<MeshBuffers>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[Corner]>,
{
    let faces = faces.into_iter();
    let mut dedup = Deduplicator::with_capacity(faces.size_hint().0);
    for face in faces {
        dedup.push_face(face.as_ref())?;
    }
    Ok(dedup.finish())
}
