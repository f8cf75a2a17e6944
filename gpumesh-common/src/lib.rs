//! Shared types and utilities for GPU-ready mesh export
//!
//! This crate provides the pieces shared between:
//! - `gpumesh-export` (asset pipeline and CLI)
//! - any runtime that loads `.bin` meshes for upload
//!
//! # Modules
//!
//! - [`vertex`] - Per-corner attribute type and its exact-equality key
//! - [`dedup`] - Vertex deduplication into vertex/index buffers
//! - [`formats`] - The GPU mesh binary format (encode/decode)
//! - [`error`] - Error taxonomy shared by all of the above

pub mod dedup;
pub mod error;
pub mod formats;
pub mod vertex;

pub use dedup::{DedupStats, Deduplicator, MeshBuffers, dedupe};
pub use error::{MeshError, Result};
pub use formats::{
    BinarySerializable, GpuMeshHeader, MESH_EXT, decode, encode, encoded_len, read_mesh,
    write_mesh,
};
pub use vertex::{Corner, MAX_VERTEX_COUNT, VERTEX_FLOATS, VERTEX_SIZE, Vertex, VertexKey};
