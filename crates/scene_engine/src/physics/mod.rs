//! Physics module for collision detection and response
//!
//! Provides collider shapes and their pairwise tests, rigid body
//! integration, layer filtering and the broad/narrow phase collision pass.
//! Resolution against game objects lives in the scene, which owns both.

pub mod collision;
pub mod collider;
pub mod collision_layers;
pub mod collision_system;
pub mod rigidbody;

pub use collision::{Aabb, BoundingSphere, ColliderShape, CollisionMesh, Contact, ShapeKind, WorldShape};
pub use collider::Collider;
pub use collision_layers::CollisionLayers;
pub use collision_system::{
    ColliderEntry, CollisionPair, ContactPair, DetectionReport, PairTransition, PhysicsCollisionSystem,
};
pub use rigidbody::Rigidbody;

/// Physics errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// No intersection test exists for this pair of shapes
    #[error("No intersection test for {a} vs {b}")]
    UnsupportedShapePair {
        /// Shape of the first collider
        a: ShapeKind,
        /// Shape of the second collider
        b: ShapeKind,
    },
}
