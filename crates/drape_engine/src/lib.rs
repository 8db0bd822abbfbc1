//! # Drape Engine
//!
//! A procedural material pipeline for draping garment textures over 3D avatar
//! meshes. Swapping the garment's surface pattern at runtime requires neither
//! mesh re-authoring nor a trustworthy UV layout.
//!
//! ## Features
//!
//! - **Normal-map synthesis**: derives a surface relief map from a plain
//!   diffuse image via local-gradient analysis
//! - **Triplanar shading**: samples textures by world-space position, avoiding
//!   UV seams and stretching on draped cloth
//! - **Garment classification**: heuristic partitioning of submeshes into
//!   garment and body roles
//! - **Asynchronous material handoff**: renders a placeholder immediately and
//!   atomically swaps in the derived material once synthesis completes
//! - **Model normalization**: centers, scales, and orients a mesh into a
//!   canonical viewing frame
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use drape_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DrapeConfig::default();
//!     let mesh = ObjLoader::load_obj("resources/models/mannequin.obj")?;
//!
//!     let mut normalizer = ModelNormalizer::from_config(&config.normalizer);
//!     let frame = normalizer.normalize(&mesh);
//!     println!("viewing transform: {:?}", frame);
//!
//!     let mut pipeline = MaterialAssignmentPipeline::new(config);
//!     pipeline.load_mesh(mesh);
//!
//!     let diffuse = Arc::new(ImageData::from_file("resources/textures/red-saree.jpg")?);
//!     pipeline.set_diffuse_texture(diffuse);
//!
//!     while !pipeline.is_settled() {
//!         pipeline.pump();
//!         std::thread::sleep(std::time::Duration::from_millis(5));
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod catalog;
pub mod config;
pub mod foundation;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod texture;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ImageData, ObjLoader},
        catalog::{SkinTone, TextureCatalog},
        config::{Config, DrapeConfig},
        foundation::math::{Transform, Vec2, Vec3},
        pipeline::{AssignmentState, MaterialAssignmentPipeline, PipelineEvent, SubmeshHandle},
        render::{Material, TriplanarShader},
        scene::{MaterialRole, MeshMaterialClassifier, ModelNormalizer, SceneMesh, Submesh},
        texture::{NormalMap, NormalMapSynthesizer},
    };
}
