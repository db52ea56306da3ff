//! Scripted per-object behaviours
//!
//! A behaviour runs once per tick after collision response and may only
//! touch its own object's transform.

use std::fmt;

use crate::foundation::math::{constants, Vec3};
use super::Transform;

/// Per-tick logic attached to a game object
pub trait Behavior: fmt::Debug {
    /// Advance by `dt` seconds
    fn update(&mut self, transform: &mut Transform, dt: f32);
}

/// Rotates at a constant Euler rate
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    /// Degrees per second around each axis
    pub rate: Vec3,
}

impl Spin {
    /// Spin at `rate` degrees per second
    pub fn new(rate: Vec3) -> Self {
        Self { rate }
    }
}

impl Behavior for Spin {
    fn update(&mut self, transform: &mut Transform, dt: f32) {
        let mut euler = transform.euler_rotation + self.rate * dt;
        for angle in euler.iter_mut() {
            *angle %= 360.0;
        }
        transform.euler_rotation = euler;
    }
}

/// Bobs up and down around the height it had on its first update
#[derive(Debug, Clone, PartialEq)]
pub struct Bob {
    /// Peak offset in world units
    pub amplitude: f32,
    /// Cycles per second
    pub frequency: f32,
    base_height: Option<f32>,
    elapsed: f32,
}

impl Bob {
    /// Create a bob with the given amplitude and frequency
    pub fn new(amplitude: f32, frequency: f32) -> Self {
        Self { amplitude, frequency, base_height: None, elapsed: 0.0 }
    }
}

impl Behavior for Bob {
    fn update(&mut self, transform: &mut Transform, dt: f32) {
        let base = *self.base_height.get_or_insert(transform.position.y);
        self.elapsed += dt;
        transform.position.y = base + self.amplitude * (constants::TAU * self.frequency * self.elapsed).sin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spin_rate() {
        let mut spin = Spin::new(Vec3::new(0.0, 90.0, 0.0));
        let mut transform = Transform::identity();
        for _ in 0..10 {
            spin.update(&mut transform, 0.1);
        }
        assert_relative_eq!(transform.euler_rotation.y, 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_spin_wraps() {
        let mut spin = Spin::new(Vec3::new(0.0, 0.0, 100.0));
        let mut transform = Transform::identity();
        spin.update(&mut transform, 4.0);
        assert_relative_eq!(transform.euler_rotation.z, 40.0, epsilon = 1e-4);
    }

    #[test]
    fn test_bob_oscillates_around_start() {
        let mut bob = Bob::new(0.5, 1.0);
        let mut transform = Transform::from_position(Vec3::new(0.0, 2.0, 0.0));

        bob.update(&mut transform, 0.25);
        assert_relative_eq!(transform.position.y, 2.5, epsilon = 1e-4);
        bob.update(&mut transform, 0.5);
        assert_relative_eq!(transform.position.y, 1.5, epsilon = 1e-4);
        bob.update(&mut transform, 0.25);
        assert_relative_eq!(transform.position.y, 2.0, epsilon = 1e-4);
    }
}
