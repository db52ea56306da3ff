//! Colliders
//!
//! A collider pairs a [`ColliderShape`] with the flags the collision pass
//! needs. It is owned by the scene and attached to at most one game object;
//! its world placement always comes from that owner's current world matrix.

use crate::assets::Model;
use crate::foundation::collections::GameObjectId;
use crate::foundation::math::Mat4;
use super::collision::{ColliderShape, ShapeKind, WorldShape};
use super::collision_layers::CollisionLayers;

/// Collision volume attached to a game object
#[derive(Debug, Clone)]
pub struct Collider {
    /// Geometry in the owner's local space
    pub shape: ColliderShape,
    /// Never moved by collision response; static pairs are never tested
    pub is_static: bool,
    /// Detects overlaps without pushing anything
    pub is_trigger: bool,
    /// Layers this collider sits on
    pub layer: CollisionLayers,
    /// Layers this collider wants to collide with
    pub mask: CollisionLayers,
    /// Model drawn as the debug proxy
    pub debug_model: Option<Model>,
    colliding: bool,
    owner: Option<GameObjectId>,
}

impl Collider {
    /// Create a detached collider
    pub fn new(shape: impl Into<ColliderShape>, debug_model: Option<Model>, is_static: bool) -> Self {
        Self {
            shape: shape.into(),
            is_static,
            is_trigger: false,
            layer: CollisionLayers::default(),
            mask: CollisionLayers::default(),
            debug_model,
            colliding: false,
            owner: None,
        }
    }

    /// Mark as trigger volume
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Set collision layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Shape family
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Whether the collider touched anything during the last update
    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    /// Game object this collider is attached to
    pub fn owner(&self) -> Option<GameObjectId> {
        self.owner
    }

    /// Shape placed with the given owner world matrix
    pub fn world_shape(&self, owner_world: &Mat4) -> WorldShape {
        self.shape.to_world(owner_world)
    }

    pub(crate) fn set_owner(&mut self, owner: Option<GameObjectId>) {
        self.owner = owner;
    }

    pub(crate) fn set_colliding(&mut self, colliding: bool) {
        self.colliding = colliding;
    }
}
