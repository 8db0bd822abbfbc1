//! Canonical viewing frame derivation
//!
//! Raw avatar assets arrive at arbitrary sizes, centered nowhere in
//! particular and facing sideways. The normalizer derives a single corrective
//! transform once per mesh load: center on the origin, scale the vertical
//! extent to a target height, apply a constant yaw correction, and drop the
//! mesh slightly so its base sits at a fixed height.

use crate::config::NormalizerConfig;
use crate::foundation::math::{Aabb, Quat, Transform, Vec3};
use crate::scene::SceneMesh;

/// Derives the corrective transform that places a mesh in the viewing frame
///
/// The pre-normalization bounding box is cached on first use. Re-running the
/// normalizer therefore yields the identical transform instead of compounding
/// scale and translation against already-normalized geometry.
#[derive(Debug, Clone)]
pub struct ModelNormalizer {
    target_height: f32,
    corrective_yaw_radians: f32,
    base_drop_fraction: f32,
    cached_bounds: Option<Aabb>,
}

impl ModelNormalizer {
    /// Create a normalizer with explicit tuning values
    pub fn new(target_height: f32, corrective_yaw_radians: f32, base_drop_fraction: f32) -> Self {
        Self {
            target_height,
            corrective_yaw_radians,
            base_drop_fraction,
            cached_bounds: None,
        }
    }

    /// Create a normalizer from configuration
    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self::new(
            config.target_height,
            config.corrective_yaw_radians,
            config.base_drop_fraction,
        )
    }

    /// Compute the corrective transform for a mesh
    ///
    /// Uses the cached original bounding box when present, so repeated calls
    /// return the same transform. A mesh with zero vertical extent keeps a
    /// scale factor of 1.0 instead of dividing by zero.
    pub fn normalize(&mut self, mesh: &SceneMesh) -> Transform {
        let bounds = match self.cached_bounds {
            Some(bounds) => bounds,
            None => {
                let bounds = mesh.aabb().unwrap_or(Aabb {
                    min: Vec3::zeros(),
                    max: Vec3::zeros(),
                });
                self.cached_bounds = Some(bounds);
                bounds
            }
        };

        let center = bounds.center();
        let size = bounds.size();

        let scale = if size.y > f32::EPSILON {
            self.target_height / size.y
        } else {
            log::warn!(
                "Mesh has zero vertical extent, keeping scale factor at 1.0"
            );
            1.0
        };

        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), self.corrective_yaw_radians);

        // Move the scaled, rotated box center to the origin, then lower the
        // mesh so its base is not under the viewpoint.
        let base_drop = size.y * scale * self.base_drop_fraction;
        let translation = -(rotation * (center * scale)) - Vec3::new(0.0, base_drop, 0.0);

        let transform = Transform {
            translation,
            rotation,
            scale,
        };

        log::debug!(
            "Normalized mesh: scale {:.4}, translation {:?}",
            transform.scale,
            transform.translation
        );

        transform
    }

    /// The pre-normalization bounding box, once a mesh has been normalized
    pub fn original_bounds(&self) -> Option<Aabb> {
        self.cached_bounds
    }
}
