use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Identifier of a node in a scene graph.
///
/// Ids are handed out sequentially by the owning graph and never reused, so
/// ordering by id matches creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A handle referencing an immutable geometry buffer in a geometry store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeometryHandle(pub u64);

/// Local affine transform of a node relative to its parent.
///
/// `pivot` is a point in the node's parent-relative frame about which rotation
/// and scale are applied. The composed matrix is
/// `T(translation) * T(pivot) * R * S * T(-pivot)`; with a zero pivot this is
/// the plain translation-rotation-scale matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub pivot: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            pivot: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        pivot: Vec3::ZERO,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the rotation from XYZ Euler angles in radians.
    pub fn with_rotation_euler(mut self, angles: Vec3) -> Self {
        self.set_euler(angles);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }

    /// Overwrite the rotation with XYZ Euler angles in radians.
    pub fn set_euler(&mut self, angles: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);
    }

    /// Compose the local matrix.
    pub fn matrix(&self) -> Mat4 {
        let trs = Mat4::from_scale_rotation_translation(self.scale, self.rotation, Vec3::ZERO);
        if self.pivot == Vec3::ZERO {
            return Mat4::from_translation(self.translation) * trs;
        }
        Mat4::from_translation(self.translation + self.pivot)
            * trs
            * Mat4::from_translation(-self.pivot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.pivot, Vec3::ZERO);
        assert!(t.matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn translation_moves_origin() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    }

    #[test]
    fn pivot_rotation_keeps_pivot_fixed() {
        // Rotating about a pivot must leave the pivot point itself in place.
        let pivot = Vec3::new(0.0, 3.0, 0.0);
        let t = Transform::default()
            .with_pivot(pivot)
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let p = t.matrix().transform_point3(pivot);
        assert!(p.abs_diff_eq(pivot, 1e-5));

        // A point one unit below the pivot swings to the pivot's right.
        let q = t.matrix().transform_point3(Vec3::new(0.0, 2.0, 0.0));
        assert!(q.abs_diff_eq(Vec3::new(1.0, 3.0, 0.0), 1e-5));
    }

    #[test]
    fn pivot_matches_wrapper_pair() {
        // translate(a) * R * translate(b) expressed with a single pivot.
        let a = Vec3::new(0.0, 2.0, 0.0);
        let b = Vec3::new(0.0, -3.0, 0.0);
        let r = Quat::from_rotation_x(0.7);
        let wrapped = Mat4::from_translation(a) * Mat4::from_quat(r) * Mat4::from_translation(b);

        let t = Transform::from_translation(a + b)
            .with_pivot(-b)
            .with_rotation(r);
        assert!(t.matrix().abs_diff_eq(wrapped, 1e-5));
    }

    #[test]
    fn euler_order_is_xyz() {
        let angles = Vec3::new(0.3, -0.2, 0.9);
        let t = Transform::default().with_rotation_euler(angles);
        let expected = Mat4::from_rotation_x(angles.x)
            * Mat4::from_rotation_y(angles.y)
            * Mat4::from_rotation_z(angles.z);
        assert!(t.matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
