//! Submesh geometry views supplied by the mesh-loading collaborator

use crate::foundation::math::{Aabb, Vec3};

/// A named, contiguous portion of a mesh with its own material assignment
///
/// This is a read-only view: the pipeline attaches materials to submeshes but
/// never edits their geometry.
#[derive(Debug, Clone)]
pub struct Submesh {
    /// Submesh name as authored in the source asset (may be empty)
    pub name: String,

    /// Name of the source material the submesh was bound to when loaded,
    /// when the asset carried one
    pub source_material_name: Option<String>,

    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Vertex normals, parallel to `positions`
    pub normals: Vec<Vec3>,
}

impl Submesh {
    /// Create a submesh view from its parts
    pub fn new(
        name: impl Into<String>,
        source_material_name: Option<String>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
    ) -> Self {
        Self {
            name: name.into(),
            source_material_name,
            positions,
            normals,
        }
    }

    /// Number of vertices in this submesh
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Bounding box of this submesh, `None` when it has no vertices
    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter())
    }
}

/// A whole mesh as a flat list of submeshes
#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    /// The submeshes making up the mesh
    pub submeshes: Vec<Submesh>,
}

impl SceneMesh {
    /// Create a mesh from submeshes
    pub fn new(submeshes: Vec<Submesh>) -> Self {
        Self { submeshes }
    }

    /// Bounding box over all submeshes, `None` for an empty mesh
    pub fn aabb(&self) -> Option<Aabb> {
        self.submeshes
            .iter()
            .filter_map(Submesh::aabb)
            .reduce(|a, b| a.union(&b))
    }

    /// Total vertex count across all submeshes
    pub fn vertex_count(&self) -> u32 {
        self.submeshes.iter().map(Submesh::vertex_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(name: &str, offset: f32) -> Submesh {
        let positions = vec![
            Vec3::new(offset, 0.0, 0.0),
            Vec3::new(offset + 1.0, 0.0, 0.0),
            Vec3::new(offset + 1.0, 1.0, 0.0),
            Vec3::new(offset, 1.0, 0.0),
        ];
        let normals = vec![Vec3::z(); 4];
        Submesh::new(name, None, positions, normals)
    }

    #[test]
    fn test_vertex_count() {
        let mesh = SceneMesh::new(vec![quad("a", 0.0), quad("b", 2.0)]);
        assert_eq!(mesh.vertex_count(), 8);
    }

    #[test]
    fn test_mesh_aabb_spans_submeshes() {
        let mesh = SceneMesh::new(vec![quad("a", 0.0), quad("b", 2.0)]);
        let aabb = mesh.aabb().unwrap();
        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_empty_mesh_has_no_aabb() {
        assert!(SceneMesh::default().aabb().is_none());
    }
}
