//! Merged mesh types.
//!
//! A [`MergedMesh`] is what the merge step hands back for one component LOD:
//! an indexed triangle list plus the material sections that partition it.

use crate::error::{ExportError, Result};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A vertex of a merged mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    /// Position in component space.
    pub position: Vec3,
    /// Normal vector.
    pub normal: Vec3,
    /// First UV channel.
    pub uv: Vec2,
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position: Vec3::from_array(position),
            normal: Vec3::from_array(normal),
            uv: Vec2::from_array(uv),
        }
    }
}

/// A contiguous range of triangles rendered with one material slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSection {
    /// Offset into the index array where this section starts. Multiple of 3.
    pub first_index: u32,
    /// Name of the material slot bound to this section.
    pub material_slot_name: String,
}

impl MaterialSection {
    pub fn new(first_index: u32, material_slot_name: impl Into<String>) -> Self {
        Self {
            first_index,
            material_slot_name: material_slot_name.into(),
        }
    }
}

/// An indexed triangle mesh produced by the merge step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedMesh {
    /// Vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices (3 per triangle, 0-based).
    pub indices: Vec<u32>,
    /// Material sections ordered by `first_index`.
    #[serde(default)]
    pub sections: Vec<MaterialSection>,
}

impl MergedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: MeshVertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Start a new material section at the current end of the index array.
    pub fn begin_section(&mut self, material_slot_name: impl Into<String>) {
        let first_index = self.indices.len() as u32;
        self.sections
            .push(MaterialSection::new(first_index, material_slot_name));
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh has no triangles to export.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check the layout invariants the OBJ writer relies on.
    ///
    /// The index count must be a multiple of 3, every index must name an
    /// existing vertex, and sections must start at offset 0, be strictly
    /// ascending, sit on triangle boundaries and each hold at least one
    /// triangle.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(ExportError::MalformedMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }

        let vertex_count = self.vertices.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ExportError::MalformedMesh(format!(
                "index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }

        if self.sections.len() > self.triangle_count() {
            return Err(ExportError::MalformedMesh(format!(
                "{} sections for {} triangles",
                self.sections.len(),
                self.triangle_count()
            )));
        }

        let mut previous: Option<u32> = None;
        for section in &self.sections {
            let offset = section.first_index;
            if offset % 3 != 0 {
                return Err(ExportError::MalformedMesh(format!(
                    "section '{}' starts at {} which is not a triangle boundary",
                    section.material_slot_name, offset
                )));
            }
            match previous {
                None if offset != 0 => {
                    return Err(ExportError::MalformedMesh(format!(
                        "first section starts at {} instead of 0",
                        offset
                    )));
                }
                Some(prev) if offset <= prev => {
                    return Err(ExportError::MalformedMesh(format!(
                        "section '{}' at {} does not follow offset {}",
                        section.material_slot_name, offset, prev
                    )));
                }
                _ => {}
            }
            if offset as usize >= self.indices.len() {
                return Err(ExportError::MalformedMesh(format!(
                    "section '{}' starts past the end of the index buffer",
                    section.material_slot_name
                )));
            }
            previous = Some(offset);
        }

        Ok(())
    }
}
