//! # Scene Engine
//!
//! Simulation core for a small 3D engine: a scene graph of named game
//! objects, rigid bodies and colliders, a scene-switch dispatcher and a
//! threaded resource loader.
//!
//! ## Features
//!
//! - **Scene graph**: parent/child transforms composed into world matrices
//! - **Physics**: gravity integration, sphere/box/capsule/mesh colliders,
//!   contact response and Enter/Stay/Exit overlap events
//! - **Resources**: name-keyed meshes, shaders and textures loaded on a
//!   worker pool
//! - **Application**: Menu / Game / Setting / Credit switching with
//!   deferred teardown while loads are in flight
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let config = EngineConfig::default();
//! let mut scene = Scene::new("Demo", SceneType::Game, &config);
//!
//! let floor = scene
//!     .add_game_object(GameObject::new("Floor", Transform::identity()), GameObjectKind::Default)
//!     .unwrap();
//! let collider = scene.create_collider(ShapeKind::Box, None, true);
//! scene.set_collider(floor, collider).unwrap();
//!
//! let ball = GameObject::new("Ball", Transform::from_position(Vec3::new(0.0, 5.0, 0.0)))
//!     .with_rigidbody(Rigidbody::new());
//! let ball = scene.add_game_object(ball, GameObjectKind::Default).unwrap();
//! let collider = scene.create_collider(ColliderShape::sphere(Vec3::zeros(), 0.5), None, false);
//! scene.set_collider(ball, collider).unwrap();
//!
//! for _ in 0..120 {
//!     scene.update(&InputSnapshot::new(), 1.0 / 60.0);
//! }
//! assert!((scene.get(ball).unwrap().transform.position.y - 1.5).abs() < 1e-3);
//! ```

#![warn(missing_docs)]

pub mod foundation;
pub mod config;
pub mod input;
pub mod events;
pub mod physics;
pub mod assets;
pub mod scene;

mod application;
mod app;

pub use application::{AppContext, AppError, AppState, LevelFactory, NextScene, Platform};
pub use app::{App, SceneSwitch};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        App, AppContext, AppError, AppState, LevelFactory, NextScene, Platform, SceneSwitch,
        assets::{
            Handle, LoadState, LoaderPool, MeshData, Model, ResourceError, ResourceManager, ShaderData, TextureData,
        },
        config::{Config, EngineConfig},
        events::{OverlapEvent, OverlapPhase},
        foundation::{
            collections::{ColliderHandle, GameObjectId},
            math::{Mat4, Vec2, Vec3, Vec4},
            time::{LoadTimer, Timer},
        },
        input::{InputButtons, InputSnapshot},
        physics::{Collider, ColliderShape, CollisionLayers, Rigidbody, ShapeKind},
        scene::{
            DrawItem, DrawList, GameObject, GameObjectKind, LightColors, LightFactory, RenderSink, Scene,
            SceneError, SceneType, Transform,
        },
    };
}
