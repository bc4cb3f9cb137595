//! Wavefront OBJ export.
//!
//! Positions are offset into world space and written with Y and Z swapped,
//! normals get the same swap without the offset, and V is flipped. Faces are
//! grouped by material section with one `usemtl` per section.

use crate::error::{ExportError, Result};
use crate::export::names::{clean_path_filename, material_group_name};
use crate::mesh::MergedMesh;
use glam::Vec3;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Comment written as the first and last line of every OBJ file.
pub const OBJ_BANNER: &str = "# merge-obj-export OBJ exporter";

/// Writes one CRLF-terminated line.
pub(crate) fn line<W: Write>(out: &mut W, args: fmt::Arguments<'_>) -> std::io::Result<()> {
    out.write_fmt(args)?;
    out.write_all(b"\r\n")
}

/// An OBJ file rendered in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjDocument {
    /// Full file contents.
    pub text: String,
    /// Material group names in the order their `usemtl` lines appear.
    pub material_groups: Vec<String>,
}

/// Serialize a mesh as OBJ into any writer.
///
/// `mtl_file_name` goes into the `mtllib` directive verbatim. Returns the
/// material group names in emission order.
pub fn write_obj_to<W: Write>(
    mesh: &MergedMesh,
    world_offset: Vec3,
    mtl_file_name: &str,
    out: &mut W,
) -> Result<Vec<String>> {
    mesh.validate()?;

    line(out, format_args!("{}", OBJ_BANNER))?;
    line(out, format_args!(""))?;
    line(out, format_args!("mtllib {}", mtl_file_name))?;
    line(out, format_args!(""))?;

    for vertex in &mesh.vertices {
        let p = vertex.position + world_offset;
        line(out, format_args!("v {:.6} {:.6} {:.6}", p.x, p.z, p.y))?;
    }
    line(out, format_args!(""))?;

    for vertex in &mesh.vertices {
        line(out, format_args!("vt {:.6} {:.6}", vertex.uv.x, 1.0 - vertex.uv.y))?;
    }
    line(out, format_args!(""))?;

    for vertex in &mesh.vertices {
        let n = vertex.normal;
        line(out, format_args!("vn {:.6} {:.6} {:.6}", n.x, n.z, n.y))?;
    }
    line(out, format_args!(""))?;

    let mut groups = Vec::with_capacity(mesh.sections.len());
    let mut sections = mesh.sections.iter().peekable();
    for (tri, face) in mesh.indices.chunks_exact(3).enumerate() {
        if let Some(section) = sections.next_if(|s| s.first_index as usize / 3 == tri) {
            let group = material_group_name(&section.material_slot_name);
            line(out, format_args!("usemtl {}", group))?;
            groups.push(group);
        }

        // Wavefront indices are 1 based
        let a = face[0] + 1;
        let b = face[1] + 1;
        let c = face[2] + 1;
        line(
            out,
            format_args!("f {}/{}/{} {}/{}/{} {}/{}/{}", a, a, a, b, b, b, c, c, c),
        )?;
    }

    line(out, format_args!("{}", OBJ_BANNER))?;
    Ok(groups)
}

/// Render a mesh as OBJ text.
pub fn render_obj(mesh: &MergedMesh, world_offset: Vec3, mtl_file_name: &str) -> Result<ObjDocument> {
    // ~60 bytes per vertex line (v/vt/vn) and ~40 per face
    let capacity = 256 + mesh.vertex_count() * 180 + mesh.triangle_count() * 40;
    let mut buf = Vec::with_capacity(capacity);
    let material_groups = write_obj_to(mesh, world_offset, mtl_file_name, &mut buf)?;
    let text = String::from_utf8(buf)
        .map_err(|e| ExportError::Export(format!("OBJ text is not UTF-8: {}", e)))?;
    Ok(ObjDocument {
        text,
        material_groups,
    })
}

/// Write a mesh to `out_path`, creating or truncating the file.
///
/// The `mtllib` line names the sibling `.mtl` file.
pub fn write_obj(mesh: &MergedMesh, world_offset: Vec3, out_path: &Path) -> Result<Vec<String>> {
    let mtl_file_name = clean_path_filename(&out_path.with_extension("mtl"));
    let mut out = BufWriter::new(File::create(out_path)?);
    let groups = write_obj_to(mesh, world_offset, &mtl_file_name, &mut out)?;
    out.flush()?;
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MaterialSection, MeshVertex};

    fn quad() -> MergedMesh {
        let mut mesh = MergedMesh::new();
        let n = [0.0, 0.0, 1.0];
        mesh.add_vertex(MeshVertex::new([0.0, 0.0, 0.0], n, [0.0, 0.0]));
        mesh.add_vertex(MeshVertex::new([1.0, 0.0, 0.0], n, [1.0, 0.0]));
        mesh.add_vertex(MeshVertex::new([1.0, 1.0, 0.0], n, [1.0, 1.0]));
        mesh.add_vertex(MeshVertex::new([0.0, 1.0, 0.0], n, [0.0, 1.0]));
        mesh.begin_section("Body");
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        mesh
    }

    fn lines_with<'a>(text: &'a str, prefix: &str) -> Vec<&'a str> {
        text.lines().filter(|l| l.starts_with(prefix)).collect()
    }

    #[test]
    fn test_export_quad() {
        let doc = render_obj(&quad(), Vec3::ZERO, "Quad_LOD0.mtl").unwrap();

        assert!(doc.text.starts_with(OBJ_BANNER));
        assert!(doc.text.contains("mtllib Quad_LOD0.mtl\r\n"));
        assert_eq!(lines_with(&doc.text, "v ").len(), 4);
        assert_eq!(lines_with(&doc.text, "vt ").len(), 4);
        assert_eq!(lines_with(&doc.text, "vn ").len(), 4);
        assert_eq!(lines_with(&doc.text, "usemtl "), vec!["usemtl Body_Body"]);
        assert_eq!(
            lines_with(&doc.text, "f "),
            vec!["f 1/1/1 2/2/2 3/3/3", "f 1/1/1 3/3/3 4/4/4"]
        );
        assert_eq!(doc.material_groups, vec!["Body_Body".to_string()]);
    }

    #[test]
    fn test_block_order() {
        let doc = render_obj(&quad(), Vec3::ZERO, "q.mtl").unwrap();
        let pos = |p: &str| doc.text.find(p).unwrap();
        assert!(pos("mtllib ") < pos("\nv "));
        assert!(pos("\nv ") < pos("\nvt "));
        assert!(pos("\nvt ") < pos("\nvn "));
        assert!(pos("\nvn ") < pos("\nusemtl "));
        assert!(pos("\nusemtl ") < pos("\nf "));
    }

    #[test]
    fn test_axis_swap_and_offset() {
        let mut mesh = MergedMesh::new();
        mesh.add_vertex(MeshVertex::new([1.0, 2.0, 3.0], [0.25, 0.5, 0.75], [0.5, 0.25]));
        mesh.add_vertex(MeshVertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]));
        mesh.add_vertex(MeshVertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]));
        mesh.sections.push(MaterialSection::new(0, "M"));
        mesh.add_triangle(0, 1, 2);

        let doc = render_obj(&mesh, Vec3::new(10.0, 20.0, 30.0), "m.mtl").unwrap();
        let v = lines_with(&doc.text, "v ");
        assert_eq!(v[0], "v 11.000000 33.000000 22.000000");
        assert_eq!(v[1], "v 10.000000 30.000000 20.000000");

        let vn = lines_with(&doc.text, "vn ");
        assert_eq!(vn[0], "vn 0.250000 0.750000 0.500000");
        assert_eq!(vn[1], "vn 0.000000 1.000000 0.000000");
    }

    #[test]
    fn test_uv_flip() {
        let doc = render_obj(&quad(), Vec3::ZERO, "q.mtl").unwrap();
        let vt = lines_with(&doc.text, "vt ");
        assert_eq!(vt[0], "vt 0.000000 1.000000");
        assert_eq!(vt[1], "vt 1.000000 1.000000");
        assert_eq!(vt[2], "vt 1.000000 0.000000");
        assert_eq!(vt[3], "vt 0.000000 0.000000");
    }

    #[test]
    fn test_face_indices_round_trip() {
        let mesh = quad();
        let doc = render_obj(&mesh, Vec3::ZERO, "q.mtl").unwrap();
        let parsed: Vec<u32> = lines_with(&doc.text, "f ")
            .iter()
            .flat_map(|l| l[2..].split(' '))
            .map(|corner| corner.split('/').next().unwrap().parse::<u32>().unwrap() - 1)
            .collect();
        assert_eq!(parsed, mesh.indices);
    }

    #[test]
    fn test_usemtl_per_section() {
        let mut mesh = quad();
        mesh.sections.push(MaterialSection::new(3, "Glass"));
        let doc = render_obj(&mesh, Vec3::ZERO, "q.mtl").unwrap();

        let body: Vec<&str> = doc.text.lines().filter(|l| l.starts_with("usemtl") || l.starts_with("f ")).collect();
        assert_eq!(
            body,
            vec![
                "usemtl Body_Body",
                "f 1/1/1 2/2/2 3/3/3",
                "usemtl Glass_Glass",
                "f 1/1/1 3/3/3 4/4/4",
            ]
        );
        assert_eq!(doc.material_groups, vec!["Body_Body", "Glass_Glass"]);
    }

    #[test]
    fn test_malformed_mesh_fails_fast() {
        let mut mesh = quad();
        mesh.indices.pop();
        assert!(matches!(
            render_obj(&mesh, Vec3::ZERO, "q.mtl"),
            Err(ExportError::MalformedMesh(_))
        ));
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = render_obj(&quad(), Vec3::ZERO, "q.mtl").unwrap();
        assert!(doc.text.ends_with("\r\n"));
        assert_eq!(doc.text.matches('\n').count(), doc.text.matches("\r\n").count());
    }
}
