//! GPU mesh binary format
//!
//! A POD format with no magic bytes or version: the file is identified by
//! context (its extension and the loader that reads it).
//!
//! All format headers implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization.

pub mod mesh;
mod serialization;

pub use mesh::*;
pub use serialization::BinarySerializable;
