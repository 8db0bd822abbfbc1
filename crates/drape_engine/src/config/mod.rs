//! Configuration system
//!
//! All tuning knobs consumed by the pipeline live here. They are loaded once
//! at startup and never derived from mesh or image contents at runtime.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DrapeConfig {
    /// Garment/body classifier tuning
    pub classifier: ClassifierConfig,

    /// Normal-map synthesis tuning
    pub synthesis: SynthesisConfig,

    /// Triplanar shading and material constants
    pub shading: ShadingConfig,

    /// Canonical viewing frame tuning
    pub normalizer: NormalizerConfig,
}

impl Config for DrapeConfig {}

/// Classifier configuration
///
/// The vertex threshold separates finely tessellated draped cloth from the
/// coarser rigid body mesh. It is asset-dependent tuning, not an algorithmic
/// invariant, which is why it lives here instead of in the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Submeshes with more vertices than this classify as garment
    pub garment_vertex_threshold: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            garment_vertex_threshold: 30_000,
        }
    }
}

/// Normal-map synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Multiplier applied to the luminance gradient before packing
    pub normal_strength: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            normal_strength: 1.0,
        }
    }
}

/// Triplanar shading configuration and material constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// World-space tiling divisor per projection axis pair
    pub tile_repeat: [f32; 2],

    /// Weight of the sampled perturbation when blending against the
    /// geometric normal (the remainder goes to the geometric normal)
    pub normal_blend_weight: f32,

    /// Direction toward the fixed light, normalized at use
    pub light_direction: [f32; 3],

    /// Directional light intensity
    pub light_intensity: f32,

    /// Constant ambient term
    pub ambient_intensity: f32,

    /// Roughness of the final and placeholder garment materials
    pub garment_roughness: f32,

    /// Metalness of the final and placeholder garment materials
    pub garment_metalness: f32,

    /// Base color of the garment placeholder shown while synthesis runs
    pub garment_placeholder_color: [f32; 3],

    /// Base color of the mannequin body material
    pub body_color: [f32; 3],

    /// Roughness of the mannequin body material
    pub body_roughness: f32,

    /// Metalness of the mannequin body material
    pub body_metalness: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            tile_repeat: [4.0, 4.0],
            normal_blend_weight: 0.65,
            light_direction: [2.0, 5.0, 2.0],
            light_intensity: 1.0,
            ambient_intensity: 0.6,
            garment_roughness: 0.6,
            garment_metalness: 0.0,
            garment_placeholder_color: [0.8, 0.8, 0.8],
            // 0xF5E9DF, the mannequin skin tone
            body_color: [245.0 / 255.0, 233.0 / 255.0, 223.0 / 255.0],
            body_roughness: 0.9,
            body_metalness: 0.0,
        }
    }
}

/// Canonical viewing frame configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Vertical extent the mesh is scaled to
    pub target_height: f32,

    /// Constant yaw correction for assets whose forward axis is flipped
    pub corrective_yaw_radians: f32,

    /// Fraction of the scaled height the mesh is lowered by, so the base
    /// sits at a fixed height instead of under the viewpoint
    pub base_drop_fraction: f32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            target_height: 1.6,
            corrective_yaw_radians: std::f32::consts::PI,
            base_drop_fraction: 0.15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = DrapeConfig::default();

        assert_eq!(config.classifier.garment_vertex_threshold, 30_000);
        assert_eq!(config.normalizer.target_height, 1.6);
        assert_eq!(config.normalizer.base_drop_fraction, 0.15);
        assert_eq!(config.shading.ambient_intensity, 0.6);
        assert!(config.shading.normal_blend_weight > 0.5);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = DrapeConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: DrapeConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            parsed.classifier.garment_vertex_threshold,
            config.classifier.garment_vertex_threshold
        );
        assert_eq!(parsed.shading.tile_repeat, config.shading.tile_repeat);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: DrapeConfig =
            toml::from_str("[classifier]\ngarment_vertex_threshold = 500\n").unwrap();

        assert_eq!(parsed.classifier.garment_vertex_threshold, 500);
        assert_eq!(parsed.normalizer.target_height, 1.6);
    }
}
