//! Heuristic garment/body submesh classification
//!
//! Source assets are inconsistent about naming: some tag the drape with a
//! recognizable material or node name, some ship a single anonymous mesh per
//! part. Two signals are therefore evaluated in a fixed precedence order:
//! a name match wins outright, and only unnamed or generically named
//! submeshes fall back to the vertex-density heuristic (draped cloth is
//! tessellated far more finely than the rigid mannequin).

use crate::config::ClassifierConfig;
use crate::scene::Submesh;

/// Name fragments that mark a submesh as garment regardless of its size
const GARMENT_NAME_HINTS: [&str; 3] = ["saree", "cloth", "drape"];

/// Material role assigned to a submesh, immutable for the mesh's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRole {
    /// Draped garment surface, receives the synthesized triplanar material
    Garment,
    /// Mannequin body, receives a fixed simple material
    Body,
}

/// Heuristic classifier partitioning submeshes into garment and body roles
#[derive(Debug, Clone)]
pub struct MeshMaterialClassifier {
    garment_vertex_threshold: u32,
}

impl MeshMaterialClassifier {
    /// Create a classifier with an explicit vertex threshold
    pub fn new(garment_vertex_threshold: u32) -> Self {
        Self {
            garment_vertex_threshold,
        }
    }

    /// Create a classifier from configuration
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.garment_vertex_threshold)
    }

    /// Classify a submesh
    ///
    /// Deterministic: the same submesh metadata always yields the same role.
    pub fn classify(&self, submesh: &Submesh) -> MaterialRole {
        if Self::name_suggests_garment(&submesh.name) {
            return MaterialRole::Garment;
        }
        if let Some(material_name) = &submesh.source_material_name {
            if Self::name_suggests_garment(material_name) {
                return MaterialRole::Garment;
            }
        }

        if submesh.vertex_count() > self.garment_vertex_threshold {
            MaterialRole::Garment
        } else {
            MaterialRole::Body
        }
    }

    fn name_suggests_garment(name: &str) -> bool {
        let lowered = name.to_lowercase();
        GARMENT_NAME_HINTS
            .iter()
            .any(|hint| lowered.contains(hint))
    }
}
