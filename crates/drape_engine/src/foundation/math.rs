//! Math utilities and types
//!
//! Provides fundamental math types for the material pipeline. All vector and
//! matrix math is backed by `nalgebra`.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing translation, rotation, and a uniform scale
///
/// The corrective transforms produced by the normalizer are always uniformly
/// scaled, so scale is a single factor rather than a per-axis vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Translation in 3D space
    pub translation: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Mat4::new_scaling(self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (point * self.scale)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Compute the bounding box of a point set
    ///
    /// Returns `None` for an empty set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.min = aabb.min.inf(p);
            aabb.max = aabb.max.sup(p);
        }
        Some(aabb)
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent of the box along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box to include another box
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_identity() {
        let transform = Transform::identity();

        assert_eq!(transform.translation, Vec3::zeros());
        assert_eq!(transform.scale, 1.0);
        assert_eq!(transform.transform_point(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_transform_point_scales_before_translating() {
        let transform = Transform {
            translation: Vec3::new(1.0, 0.0, 0.0),
            rotation: Quat::identity(),
            scale: 2.0,
        };

        let p = transform.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(p.x, 3.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_aabb_from_points() {
        let points = [
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(0.0, 5.0, 1.0),
        ];
        let aabb = Aabb::from_points(points.iter()).unwrap();

        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 5.0, 2.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 1.5, 1.0));
    }

    #[test]
    fn test_aabb_empty_point_set() {
        let points: Vec<Vec3> = Vec::new();
        assert!(Aabb::from_points(points.iter()).is_none());
    }
}
