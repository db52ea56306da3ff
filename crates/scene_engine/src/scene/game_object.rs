//! Game objects
//!
//! A game object is a named node in the scene graph. The scene owns it and
//! wires up its parent, children and collider; authoring code fills in the
//! rest through the builder methods before adding it.

use crate::assets::Model;
use crate::foundation::collections::{ColliderHandle, GameObjectId};
use crate::foundation::math::{utils, Mat4, Vec3};
use crate::physics::Rigidbody;
use super::{Behavior, Transform};

/// Role of a game object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameObjectKind {
    /// Plain object
    #[default]
    Default,
    /// Player avatar
    Player,
    /// Camera
    Camera,
    /// Light carrier
    Light,
}

/// Node of the scene graph
#[derive(Debug)]
pub struct GameObject {
    name: String,
    kind: GameObjectKind,
    /// Local transform (relative to the parent, if any)
    pub transform: Transform,
    /// Physics body; objects without one are kinematic
    pub rigidbody: Option<Rigidbody>,
    /// Renderable model
    pub model: Option<Model>,
    /// Driven by the player controller
    pub player_controller: bool,
    pub(crate) collider: Option<ColliderHandle>,
    pub(crate) parent: Option<GameObjectId>,
    pub(crate) children: Vec<GameObjectId>,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) world_matrix: Mat4,
}

impl GameObject {
    /// Create an object with the given name and transform
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        let world_matrix = transform.local_matrix();
        Self {
            name: name.into(),
            kind: GameObjectKind::Default,
            transform,
            rigidbody: None,
            model: None,
            player_controller: false,
            collider: None,
            parent: None,
            children: Vec::new(),
            behavior: None,
            world_matrix,
        }
    }

    /// Attach a model
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Attach a rigid body
    pub fn with_rigidbody(mut self, rigidbody: Rigidbody) -> Self {
        self.rigidbody = Some(rigidbody);
        self
    }

    /// Attach a behaviour
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Let the player controller drive this object
    pub fn with_player_controller(mut self, enabled: bool) -> Self {
        self.player_controller = enabled;
        self
    }

    /// Unique name within the scene
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role assigned when the object was added
    pub fn kind(&self) -> GameObjectKind {
        self.kind
    }

    /// Attached collider
    pub fn collider(&self) -> Option<ColliderHandle> {
        self.collider
    }

    /// Parent object
    pub fn parent(&self) -> Option<GameObjectId> {
        self.parent
    }

    /// Child objects in attach order
    pub fn children(&self) -> &[GameObjectId] {
        &self.children
    }

    /// Whether a behaviour is attached
    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// World matrix as of the last scene update
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    /// World position as of the last scene update
    pub fn world_position(&self) -> Vec3 {
        utils::extract_translation(&self.world_matrix)
    }

    pub(crate) fn set_kind(&mut self, kind: GameObjectKind) {
        self.kind = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Spin;

    #[test]
    fn test_builder() {
        let object = GameObject::new("Crate", Transform::from_position(Vec3::new(1.0, 2.0, 3.0)))
            .with_rigidbody(Rigidbody::new())
            .with_behavior(Spin::new(Vec3::y()))
            .with_player_controller(true);

        assert_eq!(object.name(), "Crate");
        assert_eq!(object.kind(), GameObjectKind::Default);
        assert!(object.rigidbody.is_some());
        assert!(object.has_behavior());
        assert!(object.player_controller);
        assert!(object.parent().is_none());
        assert_eq!(object.world_position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
