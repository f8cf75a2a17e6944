//! OBJ mesh ingestion
//!
//! Reads Wavefront OBJ files whose faces are already triangulated. Faces are
//! passed through with whatever corner count they have; the deduplicator
//! rejects anything that is not a triangle.

use anyhow::{Context, Result, bail};
use glam::{Vec2, Vec3};
use gpumesh_common::{Corner, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::pipeline::{build_mesh, export_faces};
use super::types::ConvertedMesh;

/// Convert an OBJ file to in-memory mesh data
pub fn convert_obj_to_memory(input: &Path) -> Result<ConvertedMesh> {
    let faces = parse_obj_file(input)?;
    if faces.is_empty() {
        bail!("No faces found in OBJ file: {:?}", input);
    }
    build_mesh(&faces).with_context(|| format!("Failed to convert OBJ: {:?}", input))
}

/// Convert an OBJ file to a GpuMesh file
pub fn convert_obj(input: &Path, output: &Path) -> Result<ConvertedMesh> {
    let faces = parse_obj_file(input)?;
    if faces.is_empty() {
        bail!("No faces found in OBJ file: {:?}", input);
    }

    let mesh =
        export_faces(&faces, output).with_context(|| format!("Failed to convert OBJ: {:?}", input))?;

    tracing::info!(
        "Converted OBJ mesh: {} faces, {} vertices, {} indices",
        faces.len(),
        mesh.vertex_count(),
        mesh.index_count()
    );

    Ok(mesh)
}

/// Parse an OBJ file into faces of corners
pub fn parse_obj_file(input: &Path) -> Result<Vec<Vec<Corner>>> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text into faces of corners.
///
/// Corners without a `vt` reference get UV (0, 0); corners without a `vn`
/// reference get a zero normal. Normals are never computed here.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Vec<Vec<Corner>>> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut faces: Vec<Vec<Corner>> = Vec::new();

    let mut missing_uvs = 0usize;
    let mut missing_normals = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let line_no = line_idx + 1;

        match parts[0] {
            "v" => {
                let [x, y, z] = parse_floats(&parts[1..], [None; 3])
                    .with_context(|| format!("Invalid vertex on line {}", line_no))?;
                positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats(&parts[1..], [None, Some(0.0)])
                    .with_context(|| format!("Invalid texture coordinate on line {}", line_no))?;
                tex_coords.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats(&parts[1..], [None; 3])
                    .with_context(|| format!("Invalid normal on line {}", line_no))?;
                normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let mut face = Vec::with_capacity(parts.len() - 1);
                for reference in &parts[1..] {
                    let (vi, vti, vni) =
                        parse_obj_vertex(reference, positions.len(), tex_coords.len(), normals.len())
                            .with_context(|| format!("Invalid face on line {}", line_no))?;

                    let uv = match vti {
                        Some(ti) => tex_coords[ti],
                        None => {
                            missing_uvs += 1;
                            Vec2::ZERO
                        }
                    };
                    let normal = match vni {
                        Some(ni) => normals[ni],
                        None => {
                            missing_normals += 1;
                            Vec3::ZERO
                        }
                    };

                    face.push(Vertex {
                        position: positions[vi],
                        normal,
                        uv,
                    });
                }
                faces.push(face);
            }
            // Groups, objects, smoothing and materials carry nothing we export
            _ => {}
        }
    }

    if missing_uvs > 0 {
        tracing::warn!("{} face corners have no texture coordinate, using (0, 0)", missing_uvs);
    }
    if missing_normals > 0 {
        tracing::warn!("{} face corners have no normal, using (0, 0, 0)", missing_normals);
    }

    Ok(faces)
}

/// Parse up to N floats, filling missing trailing components from `defaults`.
/// Extra components (e.g. the optional `w`) are ignored.
fn parse_floats<const N: usize>(parts: &[&str], defaults: [Option<f32>; N]) -> Result<[f32; N]> {
    let mut out = [0f32; N];
    for (i, (slot, default)) in out.iter_mut().zip(defaults).enumerate() {
        *slot = match (parts.get(i), default) {
            (Some(s), _) => s
                .parse::<f32>()
                .with_context(|| format!("'{}' is not a number", s))?,
            (None, Some(d)) => d,
            (None, None) => bail!("expected {} components, found {}", N, parts.len()),
        };
    }
    Ok(out)
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
///
/// Returns zero-based (position, texcoord, normal) indices, resolved against
/// the number of elements defined so far.
fn parse_obj_vertex(
    s: &str,
    position_count: usize,
    tex_coord_count: usize,
    normal_count: usize,
) -> Result<(usize, Option<usize>, Option<usize>)> {
    let mut parts = s.split('/');

    let vi = match parts.next() {
        Some(p) if !p.is_empty() => resolve_index(p, position_count, "position")?,
        _ => bail!("missing position index in '{}'", s),
    };

    let vti = match parts.next() {
        Some(p) if !p.is_empty() => Some(resolve_index(p, tex_coord_count, "texture coordinate")?),
        _ => None,
    };

    let vni = match parts.next() {
        Some(p) if !p.is_empty() => Some(resolve_index(p, normal_count, "normal")?),
        _ => None,
    };

    Ok((vi, vti, vni))
}

/// Resolve a 1-based or negative (relative) OBJ index to a zero-based one
fn resolve_index(raw: &str, count: usize, kind: &str) -> Result<usize> {
    let index: i64 = raw
        .parse()
        .with_context(|| format!("'{}' is not a valid {} index", raw, kind))?;

    let resolved = match index {
        0 => bail!("{} index 0 is invalid, OBJ indices start at 1", kind),
        i if i > 0 => Some((i - 1) as usize),
        i => count.checked_sub(i.unsigned_abs() as usize),
    };

    match resolved {
        Some(r) if r < count => Ok(r),
        _ => bail!("{} index {} out of range ({} defined)", kind, index, count),
    }
}
