//! `f32` linear algebra aliases over nalgebra
//!
//! The scene graph, physics and render hand-off all speak these types.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// Two-component vector (input axes, look deltas)
pub type Vec2 = Vector2<f32>;

/// Positions, directions and per-axis scales
pub type Vec3 = Vector3<f32>;

/// Colors and homogeneous coordinates
pub type Vec4 = Vector4<f32>;

/// Affine transforms, column-major
pub type Mat4 = Matrix4<f32>;

/// Point in 3D space
pub type Point3 = nalgebra::Point3<f32>;

/// Unit rotation
pub type Quat = Unit<Quaternion<f32>>;

/// Angular constants
pub mod constants {
    /// Half turn in radians
    pub const PI: f32 = std::f32::consts::PI;

    /// Full turn in radians
    pub const TAU: f32 = std::f32::consts::TAU;
}

/// Small helpers on top of nalgebra
pub mod utils {
    use super::{Mat4, Quat, Vec3};

    /// Degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Rotation from X/Y/Z Euler angles given in degrees
    pub fn euler_degrees_to_quat(euler: &Vec3) -> Quat {
        let radians = euler.map(deg_to_rad);
        Quat::from_euler_angles(radians.x, radians.y, radians.z)
    }

    /// Magnitude of the dominant axis
    pub fn max_abs_component(v: &Vec3) -> f32 {
        v.abs().max()
    }

    /// Length of each basis column of the upper 3x3 block
    pub fn extract_scale(matrix: &Mat4) -> Vec3 {
        let linear = matrix.fixed_view::<3, 3>(0, 0);
        Vec3::new(linear.column(0).norm(), linear.column(1).norm(), linear.column(2).norm())
    }

    /// Fourth column without the homogeneous component
    pub fn extract_translation(matrix: &Mat4) -> Vec3 {
        matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deg_to_rad() {
        assert_relative_eq!(deg_to_rad(180.0), constants::PI, epsilon = 1e-6);
        assert_relative_eq!(deg_to_rad(-90.0), -constants::TAU / 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_extract_scale_and_translation() {
        let matrix = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0))
            * euler_degrees_to_quat(&Vec3::new(0.0, 90.0, 0.0)).to_homogeneous()
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 3.0, 4.0));

        assert_relative_eq!(extract_scale(&matrix), Vec3::new(2.0, 3.0, 4.0), epsilon = 1e-5);
        assert_relative_eq!(extract_translation(&matrix), Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_max_abs_component() {
        assert_eq!(max_abs_component(&Vec3::new(-4.0, 2.0, 3.0)), 4.0);
    }
}
