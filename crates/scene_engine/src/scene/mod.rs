//! Scene graph
//!
//! A [`Scene`] owns its game objects, their colliders and the lights. Each
//! tick it drives the player controller, integrates rigid bodies, places
//! every object in world space, resolves collisions and raises overlap
//! events. Drawing only hands data to a [`RenderSink`].
//!
//! ```text
//! input -> player -> integrate -> propagate -> collide -> behaviours -> refresh -> events
//! ```

mod behavior;
mod game_object;
mod lighting;
mod render;
mod scene_graph;
mod transform;

#[cfg(test)]
mod tests;

use std::fmt;

use thiserror::Error;

use crate::foundation::collections::ColliderHandle;

pub use behavior::{Behavior, Bob, Spin};
pub use game_object::{GameObject, GameObjectKind};
pub use lighting::{DirectionalLight, LightColors, LightFactory, Lights, PointLight, SpotLight};
pub use render::{DrawItem, DrawLayer, DrawList, DrawRecord, RenderSink};
pub use scene_graph::Scene;
pub use transform::Transform;

/// Kind of scene the application can switch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneType {
    /// Main menu
    Menu,
    /// Gameplay level
    Game,
    /// Settings screen
    Setting,
    /// Credits screen
    Credit,
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Menu => "Menu",
            Self::Game => "Game",
            Self::Setting => "Setting",
            Self::Credit => "Credit",
        };
        f.write_str(name)
    }
}

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Rejected parent link
    #[error("Cannot parent {child} to {parent}: {reason}")]
    InvalidHierarchy {
        /// Requested parent name
        parent: String,
        /// Requested child name
        child: String,
        /// Why the link was rejected
        reason: String,
    },

    /// No game object with that name or id
    #[error("Unknown game object: {0}")]
    UnknownGameObject(String),

    /// Name already taken
    #[error("Game object name already in use: {0}")]
    DuplicateName(String),

    /// Collider handle not owned by this scene
    #[error("Unknown collider: {0:?}")]
    UnknownCollider(ColliderHandle),

    /// Collider already attached elsewhere
    #[error("Collider {handle:?} is already attached to {owner}")]
    ColliderInUse {
        /// Collider
        handle: ColliderHandle,
        /// Current owner name
        owner: String,
    },
}
