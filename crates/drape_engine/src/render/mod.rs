//! Materials, lighting, and the triplanar shading model

pub mod lighting;
pub mod material;
pub mod triplanar;

pub use lighting::{Light, LightingEnvironment};
pub use material::{Material, SimpleMaterialParams, TriplanarMaterialParams};
pub use triplanar::TriplanarShader;
