//! gpumesh-export library
//!
//! Provides mesh conversion functions for use by other tools and by the
//! `gpumesh-export` binary.

pub mod dump;
pub mod formats;
pub mod manifest;
pub mod mesh;

// Re-export the core types so callers need only this crate
pub use gpumesh_common::{
    Corner, DedupStats, Deduplicator, MESH_EXT, MeshBuffers, MeshError, Vertex, dedupe,
};

// Re-export key types for mesh conversion
pub use mesh::{ConvertedMesh, RedupReport, convert_obj, convert_obj_to_memory, redup_file};
