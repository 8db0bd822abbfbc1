//! Normal-map synthesis from plain color images
//!
//! Saree textures ship as flat diffuse photographs with no relief data. The
//! synthesizer fakes fine weave relief by treating image luminance as a
//! height field and packing its local gradient into a tangent-space normal
//! map. The z component is pinned high instead of renormalized: the
//! resulting relief is physically wrong but stable and flicker-free, and the
//! shading model depends on exactly this behavior.

use crate::assets::{AssetError, ImageData};
use crate::foundation::math::Vec3;

/// Byte encoding of a component in [-1, 1]: `round((c + 1) * 127)`
fn encode_component(c: f32) -> u8 {
    ((c.clamp(-1.0, 1.0) + 1.0) * 127.0).round() as u8
}

/// Decode a normal-map channel byte back to [-1, 1]
fn decode_component(byte: u8) -> f32 {
    f32::from(byte) / 127.0 - 1.0
}

/// A pixel buffer encoding one surface-normal perturbation per pixel
///
/// Channels map X=red, Y=green, Z=blue, each remapped from [-1, 1] to
/// [0, 255]; alpha is unused and fixed at 255. A normal map is derived
/// whole from its source diffuse image and never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalMap {
    image: ImageData,
}

impl NormalMap {
    /// The underlying pixel buffer
    pub fn image(&self) -> &ImageData {
        &self.image
    }

    /// Map width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Map height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Decoded perturbation vector at pixel coordinates, clamped to bounds
    ///
    /// Not renormalized; callers blend it against a geometric normal and
    /// normalize the result.
    pub fn perturbation_clamped(&self, x: i64, y: i64) -> Vec3 {
        let [r, g, b, _] = self.image.pixel_clamped(x, y);
        Vec3::new(
            decode_component(r),
            decode_component(g),
            decode_component(b),
        )
    }
}

/// Derives a [`NormalMap`] from a diffuse image via local-gradient analysis
pub struct NormalMapSynthesizer;

impl NormalMapSynthesizer {
    /// Synthesize a normal map from a diffuse image
    ///
    /// Per pixel: luminance `0.299R + 0.587G + 0.114B` normalized to [0, 1],
    /// then a 4-neighbor central difference scaled by `strength`. Border
    /// pixels reuse the boundary value instead of wrapping. The packed
    /// vector is `(dx, dy, 1)` with no renormalization.
    ///
    /// Cost is O(width * height); callers are expected to run this off the
    /// rendering path.
    pub fn synthesize(image: &ImageData, strength: f32) -> Result<NormalMap, AssetError> {
        let width = image.width();
        let height = image.height();

        if width == 0 || height == 0 {
            return Err(AssetError::InvalidImage { width, height });
        }

        let luminance = Self::luminance_field(image);
        let sample = |x: i64, y: i64| -> f32 {
            let x = x.clamp(0, i64::from(width) - 1) as usize;
            let y = y.clamp(0, i64::from(height) - 1) as usize;
            luminance[y * width as usize + x]
        };

        let mut data = Vec::with_capacity(width as usize * height as usize * 4);

        for y in 0..i64::from(height) {
            for x in 0..i64::from(width) {
                let dx = (sample(x + 1, y) - sample(x - 1, y)) * strength;
                let dy = (sample(x, y + 1) - sample(x, y - 1)) * strength;

                data.push(encode_component(dx));
                data.push(encode_component(dy));
                data.push(encode_component(1.0));
                data.push(255);
            }
        }

        let image = ImageData::new(width, height, data)?;
        Ok(NormalMap { image })
    }

    /// Per-pixel luminance normalized to [0, 1]
    fn luminance_field(image: &ImageData) -> Vec<f32> {
        image
            .data()
            .chunks_exact(4)
            .map(|px| {
                (0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]))
                    / 255.0
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Byte value of a zero component
    const FLAT_XY: u8 = 127;
    /// Byte value of the pinned-high z component
    const FLAT_Z: u8 = 254;

    #[test]
    fn test_output_dimensions_match_input() {
        for (w, h) in [(1, 1), (4, 4), (7, 3), (64, 16)] {
            let image = ImageData::checkerboard(w, h, [255; 4], [0, 0, 0, 255]);
            let map = NormalMapSynthesizer::synthesize(&image, 1.0).unwrap();
            assert_eq!(map.width(), w);
            assert_eq!(map.height(), h);
        }
    }

    #[test]
    fn test_flat_image_yields_flat_map() {
        let image = ImageData::solid_color(8, 8, [120, 80, 200, 255]);
        let map = NormalMapSynthesizer::synthesize(&image, 3.0).unwrap();

        for chunk in map.image().data().chunks_exact(4) {
            assert_eq!(chunk, [FLAT_XY, FLAT_XY, FLAT_Z, 255]);
        }
    }

    #[test]
    fn test_single_pixel_image_is_flat() {
        let image = ImageData::solid_color(1, 1, [33, 99, 11, 255]);
        let map = NormalMapSynthesizer::synthesize(&image, 5.0).unwrap();

        assert_eq!(map.image().data(), [FLAT_XY, FLAT_XY, FLAT_Z, 255]);

        let p = map.perturbation_clamped(0, 0);
        assert_relative_eq!(p.x, 0.0, epsilon = 0.01);
        assert_relative_eq!(p.y, 0.0, epsilon = 0.01);
        assert_relative_eq!(p.z, 1.0, epsilon = 0.01);
    }

    #[test]
    fn test_zero_area_image_is_invalid() {
        // A zero-area buffer cannot even be constructed; the synthesizer
        // carries the same guard for buffers built by other collaborators
        assert!(matches!(
            ImageData::new(0, 0, Vec::new()),
            Err(AssetError::InvalidImage { .. })
        ));
    }

    #[test]
    fn test_horizontal_edge_produces_x_gradient() {
        // Left half black, right half white: dx is positive at the seam
        let mut data = Vec::new();
        for _y in 0..4 {
            for x in 0..4 {
                let v = if x < 2 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let image = ImageData::new(4, 4, data).unwrap();
        let map = NormalMapSynthesizer::synthesize(&image, 1.0).unwrap();

        let at_seam = map.perturbation_clamped(2, 1);
        assert!(at_seam.x > 0.4, "expected strong +x gradient, got {}", at_seam.x);
        assert_relative_eq!(at_seam.y, 0.0, epsilon = 0.01);

        // Rows are uniform, so no vertical gradient anywhere
        let above = map.perturbation_clamped(2, 0);
        assert_relative_eq!(above.y, 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_strength_saturates_instead_of_wrapping() {
        let mut data = Vec::new();
        for _y in 0..2 {
            data.extend_from_slice(&[0, 0, 0, 255]);
            data.extend_from_slice(&[255, 255, 255, 255]);
        }
        let image = ImageData::new(2, 2, data).unwrap();
        let map = NormalMapSynthesizer::synthesize(&image, 100.0).unwrap();

        // Huge strength clamps to the [-1, 1] byte range, never overflows
        for chunk in map.image().data().chunks_exact(4) {
            assert!(chunk[0] == 0 || chunk[0] == 254 || chunk[0] == FLAT_XY);
        }
    }
}
