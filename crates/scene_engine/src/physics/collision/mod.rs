//! Collision geometry
//!
//! Collider shapes are stored in model space and transformed to world space
//! only while a test runs.
//!
//! - [`primitives`] - spheres, boxes, segments and triangles
//! - [`mesh`] - triangle mesh colliders
//! - [`shape`] - the collider shape enum and pairwise tests

pub mod primitives;
pub mod mesh;
pub mod shape;

pub use primitives::{Aabb, BoundingSphere, Segment, Triangle};
pub use mesh::{CollisionMesh, WorldMesh};
pub use shape::{ColliderShape, Contact, ShapeKind, WorldCapsule, WorldShape};
