//! Asset loading
//!
//! Decoding collaborators for the pipeline: images become [`ImageData`]
//! pixel buffers, Wavefront OBJ files become [`crate::scene::SceneMesh`]
//! submesh views. The core pipeline itself never touches a file format.

pub mod image_loader;
pub mod obj_loader;

pub use image_loader::ImageData;
pub use obj_loader::ObjLoader;

use thiserror::Error;

/// Asset system errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset failed to load or decode
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Image has no pixels to work with
    #[error("Invalid image: {width}x{height} has zero area")]
    InvalidImage {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
