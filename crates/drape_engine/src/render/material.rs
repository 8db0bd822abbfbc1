//! Material definitions
//!
//! A submesh holds exactly one material at a time, owned by the assignment
//! pipeline's submesh-to-material map. Materials are value objects built once
//! and swapped whole through documented state transitions, never mutated
//! per frame.

use std::sync::Arc;

use crate::assets::ImageData;
use crate::foundation::math::{Vec2, Vec3};
use crate::texture::NormalMap;

/// Parameters for a flat-shaded material without textures
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleMaterialParams {
    /// Base color (RGB, linear)
    pub base_color: Vec3,

    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,

    /// Metalness factor (0.0 = dielectric, 1.0 = metallic)
    pub metalness: f32,
}

impl SimpleMaterialParams {
    /// Create a material with default properties
    pub fn new() -> Self {
        Self {
            base_color: Vec3::new(1.0, 1.0, 1.0),
            roughness: 0.5,
            metalness: 0.0,
        }
    }

    /// Set the base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = Vec3::new(r, g, b);
        self
    }

    /// Set the roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Set the metalness factor
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }
}

impl Default for SimpleMaterialParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters for the triplanar garment material
///
/// Holds the diffuse texture and the normal map derived from it. Both are
/// shared immutably; a swap replaces the whole parameter set so no frame can
/// observe a normal map that mismatches the bound diffuse.
#[derive(Debug, Clone)]
pub struct TriplanarMaterialParams {
    /// Base color image, sampled by world-space position
    pub diffuse: Arc<ImageData>,

    /// Normal perturbation map derived from `diffuse`
    pub normal: Arc<NormalMap>,

    /// World-space tiling divisor per projection axis pair
    pub tile_scale: Vec2,
}

/// Material attached to a submesh
#[derive(Debug, Clone)]
pub enum Material {
    /// Flat-shaded placeholder or body material
    Simple(SimpleMaterialParams),

    /// World-space projected garment material
    Triplanar(TriplanarMaterialParams),
}

impl Material {
    /// Whether this is the triplanar garment material
    pub fn is_triplanar(&self) -> bool {
        matches!(self, Self::Triplanar(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps_factors() {
        let params = SimpleMaterialParams::new()
            .with_roughness(1.7)
            .with_metalness(-0.3);

        assert_eq!(params.roughness, 1.0);
        assert_eq!(params.metalness, 0.0);
    }

    #[test]
    fn test_material_kind_queries() {
        let simple = Material::Simple(SimpleMaterialParams::new());
        assert!(!simple.is_triplanar());
    }
}
