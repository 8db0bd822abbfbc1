//! Scene-side mesh views, classification, and normalization
//!
//! The mesh-loading collaborator supplies read-only [`Submesh`] geometry;
//! this module decides what each submesh is (garment or body) and how the
//! whole mesh should sit in the canonical viewing frame. Geometry is never
//! mutated here.

pub mod classifier;
pub mod normalizer;
pub mod submesh;

pub use classifier::{MaterialRole, MeshMaterialClassifier};
pub use normalizer::ModelNormalizer;
pub use submesh::{SceneMesh, Submesh};
