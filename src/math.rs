//! Math type aliases and helper functions.
//!
//! Rendering math is always f32. Types are thin aliases over nalgebra so the
//! rest of the crate (and downstream users) never name the generic types.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Transform a 3D point by a 4x4 matrix (w = 1, translation applies).
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    let r = m * Vec4::new(p.x, p.y, p.z, 1.0);
    Vec3::new(r.x, r.y, r.z)
}

/// Transform a 3D direction by a 4x4 matrix (w = 0, translation ignored).
pub fn transform_direction(m: &Mat4, d: &Vec3) -> Vec3 {
    let r = m * Vec4::new(d.x, d.y, d.z, 0.0);
    Vec3::new(r.x, r.y, r.z)
}
