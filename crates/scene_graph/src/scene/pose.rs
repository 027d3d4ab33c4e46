//! Local pose representation

use serde::{Deserialize, Serialize};

use crate::foundation::math::{self, Mat3, Mat4, Quat, Vec3};

/// Transform of a node relative to its parent (or to world space for a root)
///
/// The rotation is kept as an orthonormal basis; scale is applied per axis to
/// that basis before translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Translation relative to the parent
    pub position: Vec3,

    /// Orthonormal rotation basis, one axis per column
    pub rotation: Mat3,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Mat3::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Pose {
    /// Identity pose
    pub fn identity() -> Self {
        Self::default()
    }

    /// Pose from position, rotation quaternion and scale
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation: math::basis_from_quat(&rotation),
            scale,
        }
    }

    /// Pose with only a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Decompose a homogeneous matrix
    ///
    /// Scale is the length of each basis axis; the rotation is the
    /// orthonormalized basis, so any shear in `m` is dropped.
    pub fn from_matrix(m: &Mat4) -> Self {
        Self {
            position: math::translation(m),
            rotation: math::orthonormalize(&math::basis(m)),
            scale: math::axis_scale(m),
        }
    }

    /// Compose into a homogeneous matrix (`T * R * S`)
    pub fn to_matrix(&self) -> Mat4 {
        math::compose(&self.position, &self.rotation, &self.scale)
    }

    /// Rotation as a unit quaternion
    pub fn rotation_quat(&self) -> Quat {
        math::quat_from_basis(&self.rotation)
    }
}

impl From<&Mat4> for Pose {
    fn from(m: &Mat4) -> Self {
        Self::from_matrix(m)
    }
}

impl From<Pose> for Mat4 {
    fn from(pose: Pose) -> Self {
        pose.to_matrix()
    }
}
