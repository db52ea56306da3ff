//! Specialized collection types

pub use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to a game object owned by a scene
    pub struct GameObjectId;

    /// Stable handle to a collider owned by a scene
    pub struct ColliderHandle;
}
