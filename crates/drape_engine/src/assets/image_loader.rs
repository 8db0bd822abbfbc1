//! Image loading utilities for texture data
//!
//! Provides PNG and JPEG loading for diffuse textures, plus pixel access
//! helpers used by the shading model and the normal-map synthesizer.

use std::path::Path;

use crate::assets::AssetError;

/// Decoded RGBA pixel buffer
///
/// Immutable once produced. Producers hand ownership to a consumer (or share
/// it behind an `Arc`); nothing mutates pixels in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data, row-major, 4 bytes per pixel
    data: Vec<u8>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
}

impl ImageData {
    /// Create an image from raw RGBA bytes
    ///
    /// Fails with [`AssetError::InvalidImage`] when either dimension is zero
    /// or the buffer length does not match `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::InvalidImage { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AssetError::LoadFailed(format!(
                "RGBA buffer length {} does not match {}x{} ({} bytes expected)",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image: {e}")))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::info!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Self::new(width, height, rgba_img.into_raw())
    }

    /// Load an image from an in-memory byte source (e.g. a user upload)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to decode image bytes: {e}")))?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Decoded image {}x{} from memory", width, height);

        Self::new(width, height, rgba_img.into_raw())
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
        }
    }

    /// Create a two-color checkerboard image (useful for testing and demos)
    pub fn checkerboard(width: u32, height: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);

        for y in 0..height {
            for x in 0..width {
                let color = if (x + y) % 2 == 0 { a } else { b };
                data.extend_from_slice(&color);
            }
        }

        Self {
            data,
            width,
            height,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at pixel coordinates, clamped to the image bounds
    pub fn pixel_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let offset = (y * self.width as usize + x) * 4;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }

    /// Size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(img.pixel_clamped(2, 3), [255, 0, 0, 255]);
    }

    #[test]
    fn test_checkerboard_alternates() {
        let img = ImageData::checkerboard(4, 4, [255, 255, 255, 255], [0, 0, 0, 255]);
        assert_eq!(img.pixel_clamped(0, 0), [255, 255, 255, 255]);
        assert_eq!(img.pixel_clamped(1, 0), [0, 0, 0, 255]);
        assert_eq!(img.pixel_clamped(1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_area_image_rejected() {
        let result = ImageData::new(0, 4, Vec::new());
        assert!(matches!(
            result,
            Err(AssetError::InvalidImage { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_mismatched_buffer_rejected() {
        let result = ImageData::new(2, 2, vec![0; 3]);
        assert!(matches!(result, Err(AssetError::LoadFailed(_))));
    }

    #[test]
    fn test_pixel_access_clamps_at_borders() {
        let img = ImageData::checkerboard(2, 2, [10, 10, 10, 255], [200, 200, 200, 255]);
        // Reads past the edge reuse the boundary pixel instead of wrapping
        assert_eq!(img.pixel_clamped(-1, 0), img.pixel_clamped(0, 0));
        assert_eq!(img.pixel_clamped(5, 1), img.pixel_clamped(1, 1));
    }
}
