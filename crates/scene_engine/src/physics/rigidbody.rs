//! Rigid body state and integration

use crate::foundation::math::Vec3;

/// Dynamic body attached to a game object
///
/// Velocity is in world space. A body without gravity keeps its velocity
/// until a contact or gameplay code changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rigidbody {
    /// Linear velocity in units per second
    pub velocity: Vec3,
    /// Whether gravity accelerates this body
    pub use_gravity: bool,
    /// Mass (only used to weight impulses from gameplay code)
    pub mass: f32,
    /// Restitution in `[0, 1]`: 0 stops motion into a contact, 1 reflects it
    pub bounciness: f32,
    /// Set when a contact with an upward normal was resolved this tick
    pub grounded: bool,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self::new()
    }
}

impl Rigidbody {
    /// Body at rest affected by gravity
    pub fn new() -> Self {
        Self {
            velocity: Vec3::zeros(),
            use_gravity: true,
            mass: 1.0,
            bounciness: 0.0,
            grounded: false,
        }
    }

    /// Enable or disable gravity
    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    /// Set initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set restitution (clamped to `[0, 1]`)
    pub fn with_bounciness(mut self, bounciness: f32) -> Self {
        self.bounciness = bounciness.clamp(0.0, 1.0);
        self
    }

    /// Set mass (non-positive values fall back to 1)
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = if mass > 0.0 { mass } else { 1.0 };
        self
    }

    /// Semi-implicit Euler step: velocity first, then position
    pub fn integrate(&mut self, position: &mut Vec3, gravity: &Vec3, dt: f32) {
        if self.use_gravity {
            self.velocity += gravity * dt;
        }
        *position += self.velocity * dt;
    }

    /// Apply an instantaneous change of momentum
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.mass;
    }

    /// Remove (or reflect) the velocity component going into a contact
    ///
    /// `normal` points away from the surface that was hit.
    pub fn resolve_contact(&mut self, normal: &Vec3, ground_threshold: f32) {
        let into_surface = self.velocity.dot(normal);
        if into_surface < 0.0 {
            self.velocity -= normal * ((1.0 + self.bounciness) * into_surface);
        }
        if normal.y > ground_threshold {
            self.grounded = true;
        }
    }
}
