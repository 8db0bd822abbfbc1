//! OBJ file loader producing submesh views for the pipeline
//!
//! Wavefront OBJ is the bundled mesh adapter: `o`/`g` statements open a new
//! submesh and `usemtl` records the bound source-material name, both of which
//! feed the garment classifier. Callers that load meshes elsewhere can skip
//! this module entirely and construct [`Submesh`] values directly.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::scene::{SceneMesh, Submesh};

/// OBJ parsing errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed numeric data or index
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Structurally invalid file
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Wavefront OBJ loader
pub struct ObjLoader;

/// Face-vertex lists accumulated for one `o`/`g` group
#[derive(Default)]
struct GroupBuilder {
    name: String,
    material_name: Option<String>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl GroupBuilder {
    fn into_submesh(self) -> Option<Submesh> {
        if self.positions.is_empty() {
            return None;
        }
        Some(Submesh::new(
            self.name,
            self.material_name,
            self.positions,
            self.normals,
        ))
    }
}

impl ObjLoader {
    /// Load an OBJ file and return its submeshes
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<SceneMesh, ObjError> {
        let path_ref = path.as_ref();
        log::debug!("Loading OBJ from: {:?}", path_ref);

        let file = File::open(path_ref)?;
        let reader = BufReader::new(file);

        let mut positions: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();

        let mut submeshes: Vec<Submesh> = Vec::new();
        let mut group = GroupBuilder::default();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            match parts[0] {
                "v" => {
                    positions.push(Self::parse_vec3(&parts, "vertex")?);
                }
                "vn" => {
                    normals.push(Self::parse_vec3(&parts, "normal")?);
                }
                "o" | "g" => {
                    // A new group closes the current submesh; the active
                    // material persists across group statements
                    let material_name = group.material_name.clone();
                    if let Some(submesh) = std::mem::take(&mut group).into_submesh() {
                        submeshes.push(submesh);
                    }
                    group.name = parts.get(1).unwrap_or(&"").to_string();
                    group.material_name = material_name;
                }
                "usemtl" => {
                    group.material_name = parts.get(1).map(|s| (*s).to_string());
                }
                "f" => {
                    Self::parse_face(&parts, &positions, &normals, &mut group)?;
                }
                _ => {
                    // mtllib, vt, s and friends are not needed here
                }
            }
        }

        if let Some(submesh) = group.into_submesh() {
            submeshes.push(submesh);
        }

        if submeshes.is_empty() {
            return Err(ObjError::InvalidFormat(format!(
                "{path_ref:?} contains no faces"
            )));
        }

        log::info!(
            "Loaded OBJ {:?}: {} submesh(es), {} vertices total",
            path_ref,
            submeshes.len(),
            submeshes.iter().map(Submesh::vertex_count).sum::<u32>()
        );

        Ok(SceneMesh::new(submeshes))
    }

    fn parse_vec3(parts: &[&str], what: &str) -> Result<Vec3, ObjError> {
        if parts.len() < 4 {
            return Err(ObjError::InvalidFormat(format!(
                "{what} statement with fewer than 3 components"
            )));
        }
        let x: f32 = parts[1]
            .parse()
            .map_err(|_| ObjError::ParseError(format!("Invalid {what} x")))?;
        let y: f32 = parts[2]
            .parse()
            .map_err(|_| ObjError::ParseError(format!("Invalid {what} y")))?;
        let z: f32 = parts[3]
            .parse()
            .map_err(|_| ObjError::ParseError(format!("Invalid {what} z")))?;
        Ok(Vec3::new(x, y, z))
    }

    fn parse_face(
        parts: &[&str],
        positions: &[Vec3],
        normals: &[Vec3],
        group: &mut GroupBuilder,
    ) -> Result<(), ObjError> {
        if parts.len() < 4 {
            return Err(ObjError::InvalidFormat(
                "face with fewer than 3 vertices".to_string(),
            ));
        }

        let mut corners: Vec<(Vec3, Option<Vec3>)> = Vec::with_capacity(parts.len() - 1);

        for vertex_data in &parts[1..] {
            let indices: Vec<&str> = vertex_data.split('/').collect();

            let pos_idx: usize = indices[0]
                .parse()
                .map_err(|_| ObjError::ParseError("Invalid position index".to_string()))?;
            // OBJ indices are 1-based, so 0 is out of range too
            let position = *pos_idx
                .checked_sub(1)
                .and_then(|i| positions.get(i))
                .ok_or_else(|| {
                    ObjError::InvalidFormat(format!("Position index {pos_idx} out of range"))
                })?;

            // v/vt/vn: the normal index sits in the third slot when present
            let normal = if indices.len() > 2 && !indices[2].is_empty() {
                let n_idx: usize = indices[2]
                    .parse()
                    .map_err(|_| ObjError::ParseError("Invalid normal index".to_string()))?;
                Some(
                    *n_idx
                        .checked_sub(1)
                        .and_then(|i| normals.get(i))
                        .ok_or_else(|| {
                            ObjError::InvalidFormat(format!("Normal index {n_idx} out of range"))
                        })?,
                )
            } else {
                None
            };

            corners.push((position, normal));
        }

        // Triangulate as a fan and expand into flat per-vertex lists
        for i in 1..corners.len() - 1 {
            let tri = [corners[0], corners[i], corners[i + 1]];
            let face_normal = Self::face_normal(tri[0].0, tri[1].0, tri[2].0);

            for (position, normal) in tri {
                group.positions.push(position);
                group.normals.push(normal.unwrap_or(face_normal));
            }
        }

        Ok(())
    }

    /// Flat normal for faces without authored normals
    fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        let n = (b - a).cross(&(c - a));
        if n.norm() > f32::EPSILON {
            n.normalize()
        } else {
            Vec3::y()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_obj(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "drape_engine_obj_test_{}_{:?}.obj",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_groups_and_materials() {
        let path = write_temp_obj(
            "o Body\n\
             v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             usemtl skin\n\
             f 1 2 3\n\
             o Saree\n\
             v 0 0 1\nv 1 0 1\nv 0 1 1\n\
             usemtl red_cloth\n\
             f 4 5 6\n",
        );

        let mesh = ObjLoader::load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.submeshes.len(), 2);
        assert_eq!(mesh.submeshes[0].name, "Body");
        assert_eq!(mesh.submeshes[0].source_material_name.as_deref(), Some("skin"));
        assert_eq!(mesh.submeshes[1].name, "Saree");
        assert_eq!(mesh.submeshes[1].vertex_count(), 3);
    }

    #[test]
    fn test_quad_faces_triangulate() {
        let path = write_temp_obj(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             f 1 2 3 4\n",
        );

        let mesh = ObjLoader::load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // One quad becomes two triangles, six flat vertices
        assert_eq!(mesh.submeshes[0].vertex_count(), 6);
    }

    #[test]
    fn test_missing_normals_get_flat_face_normal() {
        let path = write_temp_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");

        let mesh = ObjLoader::load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        for normal in &mesh.submeshes[0].normals {
            assert_eq!(*normal, Vec3::z());
        }
    }

    #[test]
    fn test_face_with_bad_index_is_rejected() {
        let path = write_temp_obj("v 0 0 0\nf 1 2 3\n");

        let result = ObjLoader::load_obj(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ObjError::InvalidFormat(_))));
    }

    #[test]
    fn test_zero_face_index_is_rejected() {
        // Indices are 1-based; a zero index must error, not underflow
        let path = write_temp_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n");

        let result = ObjLoader::load_obj(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ObjError::InvalidFormat(_))));
    }

    #[test]
    fn test_zero_normal_index_is_rejected() {
        let path = write_temp_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vn 0 0 1\n\
             f 1//0 2//1 3//1\n",
        );

        let result = ObjLoader::load_obj(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ObjError::InvalidFormat(_))));
    }
}
