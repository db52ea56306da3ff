//! Local transforms
//!
//! A transform is always relative to the owner's parent, or to the world
//! when the owner is a root. The composed world matrix is built by the scene.

use crate::foundation::math::{utils, Mat4, Quat, Vec3};

/// Position, scale and Euler rotation (degrees, applied X then Y then Z)
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Translation
    pub position: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Euler angles in degrees
    pub euler_rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a transform from its three parts
    pub fn new(position: Vec3, scale: Vec3, euler_rotation: Vec3) -> Self {
        Self { position, scale, euler_rotation }
    }

    /// Identity transform
    pub fn identity() -> Self {
        Self::new(Vec3::zeros(), Vec3::repeat(1.0), Vec3::zeros())
    }

    /// Identity transform moved to `position`
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::identity() }
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set rotation in degrees
    pub fn with_rotation(mut self, euler_rotation: Vec3) -> Self {
        self.euler_rotation = euler_rotation;
        self
    }

    /// Rotation as a quaternion
    pub fn rotation(&self) -> Quat {
        utils::euler_degrees_to_quat(&self.euler_rotation)
    }

    /// Local matrix: translation * rotation * scale
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation().to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Move by `offset` in parent space
    pub fn translate(&mut self, offset: &Vec3) {
        self.position += offset;
    }

    /// Add to the Euler angles (degrees)
    pub fn rotate(&mut self, euler_degrees: &Vec3) {
        self.euler_rotation += euler_degrees;
    }
}
