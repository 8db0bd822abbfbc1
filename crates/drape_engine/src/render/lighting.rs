//! Lighting environment for the local shading model
//!
//! The viewer uses one fixed directional light plus a constant ambient term.
//! This is intentionally not physically based; the constants are viewer
//! tuning and stay fixed per scene.

use crate::config::ShadingConfig;
use crate::foundation::math::Vec3;

/// A directional light source
#[derive(Debug, Clone)]
pub struct Light {
    /// Unit direction pointing toward the light
    pub direction: Vec3,
    /// Light intensity
    pub intensity: f32,
}

impl Light {
    /// Create a directional light, normalizing the direction
    pub fn directional(direction: Vec3, intensity: f32) -> Self {
        let norm = direction.norm();
        let direction = if norm > f32::EPSILON {
            direction / norm
        } else {
            Vec3::y()
        };
        Self {
            direction,
            intensity,
        }
    }
}

/// Fixed lighting environment: one directional light and an ambient term
#[derive(Debug, Clone)]
pub struct LightingEnvironment {
    /// The single directional light
    pub light: Light,
    /// Constant ambient intensity
    pub ambient_intensity: f32,
}

impl LightingEnvironment {
    /// Create a lighting environment
    pub fn new(light: Light, ambient_intensity: f32) -> Self {
        Self {
            light,
            ambient_intensity,
        }
    }

    /// Build the environment from shading configuration
    pub fn from_config(config: &ShadingConfig) -> Self {
        let [x, y, z] = config.light_direction;
        Self::new(
            Light::directional(Vec3::new(x, y, z), config.light_intensity),
            config.ambient_intensity,
        )
    }

    /// Lambertian shading factor for a unit surface normal
    ///
    /// `ambient + max(dot(normal, light_dir), 0) * intensity`, clamped to 1.
    pub fn shade_factor(&self, normal: &Vec3) -> f32 {
        let lambert = normal.dot(&self.light.direction).max(0.0) * self.light.intensity;
        (self.ambient_intensity + lambert).min(1.0)
    }
}

impl Default for LightingEnvironment {
    fn default() -> Self {
        Self::from_config(&ShadingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_is_normalized() {
        let light = Light::directional(Vec3::new(2.0, 5.0, 2.0), 1.0);
        assert_relative_eq!(light.direction.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_backfacing_normal_gets_ambient_only() {
        let env = LightingEnvironment::new(Light::directional(Vec3::y(), 1.0), 0.6);
        let factor = env.shade_factor(&-Vec3::y());
        assert_relative_eq!(factor, 0.6, epsilon = 1e-6);
    }

    #[test]
    fn test_facing_normal_saturates_at_one() {
        let env = LightingEnvironment::new(Light::directional(Vec3::y(), 1.0), 0.6);
        let factor = env.shade_factor(&Vec3::y());
        assert_relative_eq!(factor, 1.0, epsilon = 1e-6);
    }
}
