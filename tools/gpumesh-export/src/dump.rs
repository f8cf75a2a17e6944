//! Human-readable listing of mesh buffers

use gpumesh_common::MeshBuffers;
use std::io::{self, Write};

/// Write every vertex and every triangle of `mesh`.
///
/// ```text
/// [0] p: [0, 0, 0] n: [0, 0, 1] uv: [0, 0]
/// ...
/// (0 1 2)
/// ```
pub fn write_dump<W: Write>(w: &mut W, mesh: &MeshBuffers) -> io::Result<()> {
    for (i, v) in mesh.vertices.iter().enumerate() {
        writeln!(w, "[{}] p: {} n: {} uv: {}", i, v.position, v.normal, v.uv)?;
    }

    for [a, b, c] in mesh.triangles() {
        writeln!(w, "({} {} {})", a, b, c)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpumesh_common::Vertex;

    #[test]
    fn test_dump_format() {
        let mesh = MeshBuffers {
            vertices: vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([1.5, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
            indices: vec![0, 1, 2, 2, 1, 0],
        };

        let mut out = Vec::new();
        write_dump(&mut out, &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("[1] p: [1.5, 0, 0]"), "{}", lines[1]);
        assert_eq!(lines[3], "(0 1 2)");
        assert_eq!(lines[4], "(2 1 0)");
    }
}
