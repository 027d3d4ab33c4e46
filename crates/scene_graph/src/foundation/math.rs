//! Math utilities and types
//!
//! Matrices follow nalgebra's column-vector convention: a point is transformed
//! as `m * p`, so a child's world matrix is `parent_world * child_local`.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Axes shorter than this are treated as collapsed when orthonormalizing.
const AXIS_EPSILON: f32 = 1.0e-8;

/// Translation column of a homogeneous matrix
pub fn translation(m: &Mat4) -> Vec3 {
    m.fixed_view::<3, 1>(0, 3).into_owned()
}

/// Upper-left 3x3 block (rotation and scale) of a homogeneous matrix
pub fn basis(m: &Mat4) -> Mat3 {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Length of each basis axis, i.e. the per-axis scale baked into `m`
pub fn axis_scale(m: &Mat4) -> Vec3 {
    let b = basis(m);
    Vec3::new(b.column(0).norm(), b.column(1).norm(), b.column(2).norm())
}

/// Build `T * R * S` from a translation, a rotation basis and a per-axis scale
pub fn compose(position: &Vec3, rotation: &Mat3, scale: &Vec3) -> Mat4 {
    let mut m = Mat4::identity();
    m.fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&(rotation * Mat3::from_diagonal(scale)));
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(position);
    m
}

/// Replace the 3x3 block of `m`, keeping its translation
pub fn with_basis(m: &Mat4, b: &Mat3) -> Mat4 {
    let mut out = *m;
    out.fixed_view_mut::<3, 3>(0, 0).copy_from(b);
    out
}

/// Gram-Schmidt orthonormalization of a basis, keeping its handedness
///
/// Strips scale and shear from the axes. A collapsed axis is rebuilt from the
/// other two so the result is always a proper orthonormal basis.
pub fn orthonormalize(b: &Mat3) -> Mat3 {
    let x = b
        .column(0)
        .into_owned()
        .try_normalize(AXIS_EPSILON)
        .unwrap_or_else(Vec3::x);

    let y_raw = b.column(1).into_owned();
    let y = (y_raw - x * x.dot(&y_raw))
        .try_normalize(AXIS_EPSILON)
        .unwrap_or_else(|| any_perpendicular(&x));

    let z_raw = b.column(2).into_owned();
    let right_handed = x.cross(&y);
    let z = if z_raw.dot(&right_handed) < 0.0 {
        -right_handed
    } else {
        right_handed
    };

    Mat3::from_columns(&[x, y, z])
}

/// Strip scale and shear from the basis of a homogeneous matrix
pub fn orthonormalize_pose(m: &Mat4) -> Mat4 {
    with_basis(m, &orthonormalize(&basis(m)))
}

/// Unit quaternion for an orthonormal basis
pub fn quat_from_basis(b: &Mat3) -> Quat {
    Quat::from_matrix(b)
}

/// Orthonormal basis for a unit quaternion
pub fn basis_from_quat(q: &Quat) -> Mat3 {
    q.to_rotation_matrix().into_inner()
}

fn any_perpendicular(v: &Vec3) -> Vec3 {
    let helper = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    v.cross(&helper).normalize()
}
