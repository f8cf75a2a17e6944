//! Mesh converter (triangulated OBJ -> .bin)

mod obj;
mod pipeline;
mod redup;
mod types;

// Re-export public API
pub use obj::{convert_obj, convert_obj_to_memory, parse_obj, parse_obj_file};
pub use pipeline::{build_mesh, export_faces};
pub use redup::{redup_file, redup_mesh};
pub use types::{ConvertedMesh, RedupReport};
