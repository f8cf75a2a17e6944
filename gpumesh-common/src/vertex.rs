//! Vertex attribute layout and exact-equality identity
//!
//! A vertex is the attribute triple carried by one face corner:
//! position (f32×3), normal (f32×3) and UV (f32×2). The same layout is used
//! both for corners coming from the upstream mesh and for the entries of the
//! deduplicated vertex buffer, and it matches the wire layout of the binary
//! format one-to-one.
//!
//! # Layout
//! ```text
//! 0x00: position [f32; 3]
//! 0x0C: normal   [f32; 3]
//! 0x18: uv       [f32; 2]
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Number of f32 components per vertex
pub const VERTEX_FLOATS: usize = 8;

/// Size of one vertex in bytes (in memory and on the wire)
pub const VERTEX_SIZE: usize = VERTEX_FLOATS * size_of::<f32>();

/// Maximum number of unique vertices a mesh may have.
/// Indices are u16, so vertex 65535 would be the first unaddressable one.
pub const MAX_VERTEX_COUNT: usize = u16::MAX as usize;

/// One entry of the vertex buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Attributes of a single face corner, as produced by the upstream mesh.
///
/// Corners and vertices share a layout; a vertex is simply a corner that
/// survived deduplication.
pub type Corner = Vertex;

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position: Vec3::from(position),
            normal: Vec3::from(normal),
            uv: Vec2::from(uv),
        }
    }

    /// Components in wire order: pos.xyz, norm.xyz, uv.xy
    #[inline]
    pub fn to_array(&self) -> [f32; VERTEX_FLOATS] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.normal.x,
            self.normal.y,
            self.normal.z,
            self.uv.x,
            self.uv.y,
        ]
    }

    #[inline]
    pub fn from_array(a: [f32; VERTEX_FLOATS]) -> Self {
        Self {
            position: Vec3::new(a[0], a[1], a[2]),
            normal: Vec3::new(a[3], a[4], a[5]),
            uv: Vec2::new(a[6], a[7]),
        }
    }

    /// Exact identity key of this vertex.
    #[inline]
    pub fn key(&self) -> VertexKey {
        VertexKey(self.to_array().map(f32::to_bits))
    }

    /// Bitwise equality on all 8 components.
    ///
    /// Unlike `==`, this treats `-0.0` and `0.0` as different and a NaN as equal
    /// to a NaN with the same payload.
    #[inline]
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

/// Hashable identity of a vertex: the raw IEEE-754 bits of its 8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey(pub [u32; VERTEX_FLOATS]);

impl VertexKey {
    pub fn to_vertex(self) -> Vertex {
        Vertex::from_array(self.0.map(f32::from_bits))
    }
}

impl From<&Vertex> for VertexKey {
    fn from(v: &Vertex) -> Self {
        v.key()
    }
}
